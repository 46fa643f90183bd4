//! Signal handling and status output.

pub mod signals;
pub mod status;
