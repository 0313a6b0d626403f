//! Lid motion controller
//!
//! Pure decision logic, no hardware access: operator events go in
//! through [`LidController::handle_event`], one sensor reading goes in
//! per control tick through [`LidController::update`], and a motor
//! command comes back out. The firmware tasks own the actual pins and
//! the timing.
//!
//! Policy:
//! - Open/close toggles: from rest in `Closed` it opens, from anywhere
//!   else (open, tilted, or mid-travel) it closes.
//! - Tilt advances one stage, only while settled and not closed.
//! - Accessory switching off forces the lid closed; switching on is
//!   only recorded.
//! - A lost sensor reading aborts any motion in progress.

use crate::config::LidCalibration;
use crate::position::{LidPosition, LidStatus, MoveDirection};

use super::inputs::CurrentStatus;

/// Operator input events, as delivered by the input tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Open/close button pressed
    OpenClose,
    /// Tilt button pressed
    Tilt,
    /// Accessory sense went high
    AccessoryOn,
    /// Accessory sense went low
    AccessoryOff,
}

/// Desired motor state for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    /// Whether the motor should be energized
    pub running: bool,
    /// Polarity to drive with when running
    pub direction: MoveDirection,
}

impl MotorCommand {
    /// Motor de-energized. The direction is meaningless while stopped
    /// and fixed to `Forward` so stopped commands compare equal.
    pub const fn stopped() -> Self {
        Self {
            running: false,
            direction: MoveDirection::Forward,
        }
    }

    /// Motor energized with the given polarity.
    pub const fn run(direction: MoveDirection) -> Self {
        Self {
            running: true,
            direction,
        }
    }
}

/// Decision core for the lid mechanism.
///
/// Holds the status record, the active band calibration, and at most
/// one pending motion target. Drives toward the target until a settled
/// reading lands inside its band.
pub struct LidController {
    status: CurrentStatus,
    calibration: LidCalibration,
    target: Option<LidPosition>,
}

impl LidController {
    /// Controller with the given band calibration, starting closed.
    ///
    /// The first classified reading corrects the status if the lid was
    /// left elsewhere at power-down.
    pub fn new(calibration: LidCalibration) -> Self {
        Self {
            status: CurrentStatus::new(),
            calibration,
            target: None,
        }
    }

    /// Record an operator event. Decisions are deferred to the next
    /// [`update`](Self::update) so they use a fresh sensor reading.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::OpenClose => self.status.open_close_button_state = true,
            InputEvent::Tilt => self.status.tilt_button_state = true,
            InputEvent::AccessoryOn => self.status.accessory_state = true,
            InputEvent::AccessoryOff => self.status.accessory_state = false,
        }
    }

    /// One control tick: fold in the latest sensor reading and the
    /// events recorded since the previous tick, and return the motor
    /// command to apply.
    ///
    /// `None` means the position sensor is faulted; any motion in
    /// progress is abandoned and the motor is stopped.
    pub fn update(&mut self, reading: Option<u16>) -> MotorCommand {
        let command = match reading {
            Some(reading) => self.decide(reading),
            None => {
                self.target = None;
                MotorCommand::stopped()
            }
        };
        self.status.end_tick();
        command
    }

    /// Abandon the pending motion target, if any. The next
    /// [`update`](Self::update) will command a stop.
    pub fn abort(&mut self) {
        self.target = None;
    }

    /// Last settled status.
    pub fn lid_status(&self) -> LidStatus {
        self.status.lid_status
    }

    /// The band currently being driven toward.
    pub fn target(&self) -> Option<LidPosition> {
        self.target
    }

    /// Whether a motion target is pending.
    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    /// The full status record, for logging and tests.
    pub fn current_status(&self) -> &CurrentStatus {
        &self.status
    }

    fn decide(&mut self, reading: u16) -> MotorCommand {
        // Settled bands update the authoritative status. This also
        // tracks manual movement and the pass-through bands crossed
        // during a long travel.
        if let Some(settled) = self.calibration.classify(reading) {
            if settled != self.status.lid_status {
                self.status.record_lid_status(settled);
            }
        }

        // Operator inputs recorded since the previous tick. The
        // accessory drop wins over buttons pressed on the same tick.
        if self.status.accessory_switched_off() {
            self.target = Some(self.calibration.band_for(LidStatus::Closed));
        } else if self.status.open_close_button_state {
            self.target = Some(self.toggle_target());
        } else if self.status.tilt_button_state {
            self.apply_tilt_step();
        }

        // Arrival: a reading inside the target band ends the motion.
        if let Some(target) = self.target {
            if target.contains(reading) {
                self.target = None;
            }
        }

        match self.target {
            Some(target) => MotorCommand::run(target.movement_direction),
            None => MotorCommand::stopped(),
        }
    }

    /// Open/close button policy: only a lid resting in `Closed` opens;
    /// every other situation closes. Closing drives `Backward`, which
    /// converges from any point of the travel.
    fn toggle_target(&self) -> LidPosition {
        if self.target.is_none() && self.status.lid_status == LidStatus::Closed {
            self.calibration.band_for(LidStatus::Open)
        } else {
            self.calibration.band_for(LidStatus::Closed)
        }
    }

    /// Tilt button policy: advance one stage. Ignored mid-travel (a
    /// press must not queue) and while closed (the lid opens with the
    /// other button first). At the last stage the hold makes the press
    /// a no-op.
    fn apply_tilt_step(&mut self) {
        if self.target.is_some() || self.status.lid_status == LidStatus::Closed {
            return;
        }
        let next = self.status.lid_status.next_or_hold();
        if next == self.status.lid_status {
            return;
        }
        self.target = Some(self.calibration.band_for(next));
    }
}

impl Default for LidController {
    fn default() -> Self {
        Self::new(LidCalibration::factory())
    }
}
