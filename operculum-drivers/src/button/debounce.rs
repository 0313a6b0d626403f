//! Counter-integrator button debouncer
//!
//! Polled at a fixed rate, the debouncer integrates the raw level with
//! a saturating counter: the active level counts up toward a
//! threshold, the inactive level counts down toward zero, and edges
//! fire only at the two ends. Contact bounce moves the counter around
//! the middle without ever reaching either end.
//!
//! # Usage
//!
//! ```ignore
//! // 30ms debounce at a 5ms poll rate
//! let mut button = DebouncedButton::active_low(pin, 6);
//!
//! loop {
//!     if let Some(ButtonEdge::Pressed) = button.poll()? {
//!         // handle the press
//!     }
//!     // sleep one poll interval
//! }
//! ```

use embedded_hal::digital::InputPin;

/// A debounced level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    /// Confirmed inactive-to-active transition
    Pressed,
    /// Confirmed active-to-inactive transition
    Released,
}

/// One debounced input, generic over the raw pin.
///
/// Works for momentary buttons and for slow level inputs like the
/// accessory power sense; [`is_pressed`](Self::is_pressed) exposes the
/// debounced level for the latter.
pub struct DebouncedButton<P> {
    pin: P,
    active_low: bool,
    threshold: u8,
    counter: u8,
    pressed: bool,
}

impl<P: InputPin> DebouncedButton<P> {
    /// `threshold` is the number of consecutive polls the level must
    /// hold; zero is treated as one.
    pub fn new(pin: P, active_low: bool, threshold: u8) -> Self {
        Self {
            pin,
            active_low,
            threshold: threshold.max(1),
            counter: 0,
            pressed: false,
        }
    }

    /// A switch to ground (reads low when pressed).
    pub fn active_low(pin: P, threshold: u8) -> Self {
        Self::new(pin, true, threshold)
    }

    /// A high-true input.
    pub fn active_high(pin: P, threshold: u8) -> Self {
        Self::new(pin, false, threshold)
    }

    /// Sample the pin once. Call at a fixed rate.
    pub fn poll(&mut self) -> Result<Option<ButtonEdge>, P::Error> {
        let raw_active = if self.active_low {
            self.pin.is_low()?
        } else {
            self.pin.is_high()?
        };

        if raw_active {
            if self.counter < self.threshold {
                self.counter += 1;
            }
        } else if self.counter > 0 {
            self.counter -= 1;
        }

        if !self.pressed && self.counter >= self.threshold {
            self.pressed = true;
            return Ok(Some(ButtonEdge::Pressed));
        }
        if self.pressed && self.counter == 0 {
            self.pressed = false;
            return Ok(Some(ButtonEdge::Released));
        }

        Ok(None)
    }

    /// The debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
