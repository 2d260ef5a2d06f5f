pub(crate) mod centroid;
pub(crate) mod route;
