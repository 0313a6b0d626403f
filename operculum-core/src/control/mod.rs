//! Control-loop decision logic
//!
//! Everything the firmware's controller task thinks with, kept free of
//! hardware so it runs under host tests:
//!
//! - [`CurrentStatus`]: the per-tick input/status record
//! - [`LidController`]: event handling, targeting, and motor commands

pub mod controller;
pub mod inputs;

pub use controller::{InputEvent, LidController, MotorCommand};
pub use inputs::CurrentStatus;
