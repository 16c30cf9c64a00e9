pub(crate) mod delivery;
pub(crate) mod encode;
pub(crate) mod pipeline;
pub(crate) mod targets;
