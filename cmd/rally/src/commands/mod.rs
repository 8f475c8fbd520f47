//! Command implementations.

pub mod play;
pub mod probe;
pub mod trace;
pub mod verify;
