//! Board-agnostic core logic for the Operculum lid controller
//!
//! This crate contains all decision logic that does not depend on
//! specific hardware implementations:
//!
//! - Lid status model and sensor band classification
//! - Tilt sequencing (which band to drive toward next)
//! - Control-loop decision engine (buttons, accessory, targets)
//! - Travel safety monitoring
//! - Hardware and calibration configuration types
//! - Motor driver trait

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod position;
pub mod safety;
pub mod traits;
