pub mod cache;
pub mod status;
