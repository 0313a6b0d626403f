//! Hardware configuration types
//!
//! Describes the board wiring and the loop timings in plain data so
//! the firmware has a single place to read them from. Pin numbers are
//! documentation for the wiring; the firmware still owns the concrete
//! GPIO setup.

use crate::safety::TravelConfig;

/// One GPIO assignment with its electrical convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO number on the package
    pub pin: u8,
    /// Logical level is the inverse of the electrical level
    pub inverted: bool,
    /// Internal pull-up requested
    pub pull_up: bool,
}

impl PinConfig {
    /// A switch to ground with an internal pull-up.
    pub const fn active_low(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// A high-true signal, externally driven.
    pub const fn active_high(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }
}

/// Every pin the lid mechanism occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidPins {
    /// Open/close push button
    pub open_close_button: PinConfig,
    /// Tilt push button
    pub tilt_button: PinConfig,
    /// Accessory power sense input
    pub accessory_sense: PinConfig,
    /// H-bridge input energizing the opening side
    pub motor_open: PinConfig,
    /// H-bridge input energizing the closing side
    pub motor_close: PinConfig,
    /// ADC channel of the position potentiometer
    pub position_adc_channel: u8,
}

/// Loop intervals and motion limits, all in milliseconds unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// Controller decision interval
    pub control_tick_ms: u32,
    /// Button sampling interval
    pub button_poll_ms: u32,
    /// Time a button level must hold to count as an edge
    pub button_debounce_ms: u32,
    /// Position sensor sampling interval
    pub position_sample_ms: u32,
    /// Motor driver state machine interval
    pub motor_update_ms: u32,
    /// Both-low dwell before the H-bridge may reverse
    pub min_reverse_delay_ms: u32,
    /// Longest acceptable single travel
    pub max_travel_ms: u32,
    /// Stall detection sampling interval
    pub stall_window_ms: u32,
    /// Minimum counts of progress per stall window
    pub stall_min_progress: u16,
}

impl Timings {
    /// Debounce counter threshold at the configured poll rate.
    ///
    /// `button_poll_ms` must be non-zero.
    pub const fn debounce_threshold(&self) -> u8 {
        let ticks = self.button_debounce_ms / self.button_poll_ms;
        if ticks == 0 {
            1
        } else {
            ticks as u8
        }
    }

    /// The travel watchdog limits expressed by these timings.
    pub const fn travel(&self) -> TravelConfig {
        TravelConfig {
            max_travel_ms: self.max_travel_ms,
            min_progress: self.stall_min_progress,
            window_ms: self.stall_window_ms,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            control_tick_ms: 20,
            button_poll_ms: 5,
            button_debounce_ms: 30,
            position_sample_ms: 10,
            motor_update_ms: 1,
            min_reverse_delay_ms: 250,
            max_travel_ms: 12_000,
            stall_window_ms: 250,
            stall_min_progress: 3,
        }
    }
}

/// Complete hardware description for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidConfig {
    pub pins: LidPins,
    pub timings: Timings,
}

impl LidConfig {
    /// Wiring of the reference carrier board.
    pub const fn reference_board() -> Self {
        Self {
            pins: LidPins {
                open_close_button: PinConfig::active_low(10),
                tilt_button: PinConfig::active_low(11),
                accessory_sense: PinConfig::active_high(12),
                motor_open: PinConfig::active_high(14),
                motor_close: PinConfig::active_high(15),
                position_adc_channel: 0,
            },
            timings: Timings {
                control_tick_ms: 20,
                button_poll_ms: 5,
                button_debounce_ms: 30,
                position_sample_ms: 10,
                motor_update_ms: 1,
                min_reverse_delay_ms: 250,
                max_travel_ms: 12_000,
                stall_window_ms: 250,
                stall_min_progress: 3,
            },
        }
    }
}

impl Default for LidConfig {
    fn default() -> Self {
        Self::reference_board()
    }
}
