//! Control loop state machine and its cancellation channel.

pub mod control_loop;
pub mod shutdown;

pub use control_loop::ControlLoop;
