//! Hardware abstraction traits
//!
//! Implemented by the driver crate for real hardware and by test
//! doubles on the host.

pub mod motor;

pub use motor::{LidMotorDriver, MotorError};
