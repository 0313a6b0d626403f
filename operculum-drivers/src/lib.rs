//! Hardware driver implementations
//!
//! Concrete drivers for the lid mechanism, generic over the
//! `embedded-hal` 1.0 pin traits so they run against real GPIO on the
//! target and against fakes on the host:
//!
//! - H-bridge motor driver with reversal dwell
//! - Counter-integrator button debouncer
//! - Potentiometer position sensor with rail fault detection

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod motor;
pub mod sensor;
