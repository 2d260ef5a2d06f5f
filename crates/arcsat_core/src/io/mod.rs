pub mod export;
pub mod options;
pub(crate) mod records;
