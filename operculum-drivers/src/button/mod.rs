//! Operator input handling
//!
//! Debouncing for the push buttons and the accessory sense line.

pub mod debounce;

pub use debounce::{ButtonEdge, DebouncedButton};
