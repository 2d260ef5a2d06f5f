pub(crate) mod distance;
pub(crate) mod point;
