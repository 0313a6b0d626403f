//! Configuration types
//!
//! Plain-data descriptions of the board (pins, timings) and of the
//! unit (band calibration). The firmware decides where these come
//! from; the core only defines and validates them.

pub mod calibration;
pub mod hardware;

pub use calibration::{
    Band, CalibrationError, LidCalibration, CALIBRATION_MAGIC, CALIBRATION_VERSION,
};
pub use hardware::{LidConfig, LidPins, PinConfig, Timings};
