//! Controller configuration: typed settings and environment loading.

pub mod env;
pub mod types;
