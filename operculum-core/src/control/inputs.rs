//! Operator input and status record
//!
//! One record tracks everything the control loop saw on its last pass:
//! the debounced button levels, the accessory sense level, and the
//! last settled lid status. Each "current" field is paired with an
//! "old" field so edges (press, accessory drop, status change) can be
//! detected by comparison instead of extra flags.

use crate::position::LidStatus;

/// Snapshot of operator inputs and lid state for one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentStatus {
    /// Accessory sense level on the previous tick
    pub old_accessory_state: bool,
    /// Accessory sense level now
    pub accessory_state: bool,
    /// Settled status before the most recent change
    pub old_lid_status: LidStatus,
    /// Last settled status
    pub lid_status: LidStatus,
    /// Open/close button pressed since the previous tick
    pub open_close_button_state: bool,
    /// Tilt button pressed since the previous tick
    pub tilt_button_state: bool,
}

impl CurrentStatus {
    /// A powered-down record: lid closed, nothing pressed, accessory off.
    pub const fn new() -> Self {
        Self {
            old_accessory_state: false,
            accessory_state: false,
            old_lid_status: LidStatus::Closed,
            lid_status: LidStatus::Closed,
            open_close_button_state: false,
            tilt_button_state: false,
        }
    }

    /// Record a newly settled status, shifting the current one into
    /// `old_lid_status`.
    pub fn record_lid_status(&mut self, new: LidStatus) {
        self.old_lid_status = self.lid_status;
        self.lid_status = new;
    }

    /// Whether the most recent [`record_lid_status`](Self::record_lid_status)
    /// changed the status.
    pub fn lid_status_changed(&self) -> bool {
        self.old_lid_status != self.lid_status
    }

    /// Accessory went from off to on since the previous tick.
    pub fn accessory_switched_on(&self) -> bool {
        !self.old_accessory_state && self.accessory_state
    }

    /// Accessory went from on to off since the previous tick.
    pub fn accessory_switched_off(&self) -> bool {
        self.old_accessory_state && !self.accessory_state
    }

    /// Close out a control tick: button presses are consumed and the
    /// accessory level becomes the new reference for edge detection.
    pub fn end_tick(&mut self) {
        self.old_accessory_state = self.accessory_state;
        self.open_close_button_state = false;
        self.tilt_button_state = false;
    }
}

impl Default for CurrentStatus {
    fn default() -> Self {
        Self::new()
    }
}
