pub(crate) mod background;
pub(crate) mod compositor;
pub(crate) mod placement;
pub(crate) mod surface;
pub(crate) mod view;
