//! Lid position model
//!
//! Maps between raw position-sensor readings, discrete lid statuses and
//! the sensor bands the motor drives toward.

pub mod range;
pub mod sequence;
pub mod status;

pub use range::{classify_reading, position_range_from_raw, LidPosition};
pub use sequence::{next_tilt_target, next_tilt_target_from_raw, previous_tilt_target};
pub use status::{InvalidStatus, LidStatus, MoveDirection};
