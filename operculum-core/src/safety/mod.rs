//! Travel safety monitoring
//!
//! Fail-safe supervision of motor travels: timeouts and stall
//! detection over the position reading.

pub mod monitor;

pub use monitor::{TravelConfig, TravelFault, TravelMonitor};
