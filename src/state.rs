pub(crate) mod invalidation;
pub(crate) mod params;
pub(crate) mod patch;
pub(crate) mod store;
