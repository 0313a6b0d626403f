//! Position sensing
//!
//! Potentiometer reading, rail fault detection and filtering.

pub mod pot;

pub use pot::{AdcReader, PotFilter, PotPositionSensor, SensorError, ADC_MAX, MEDIAN_WINDOW};
