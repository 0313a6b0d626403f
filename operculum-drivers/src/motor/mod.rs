//! Motor driver implementations
//!
//! The lid motor is a brushed DC gearmotor behind a two-input H-bridge;
//! the driver here owns the bridge sequencing (reversal dwell,
//! shoot-through protection).

pub mod hbridge;

pub use hbridge::{HBridgeConfig, HBridgeMotor};
