//! Motor driver trait
//!
//! The seam between the decision logic and the concrete H-bridge (or a
//! bench fake): the controller emits [`MotorCommand`]s, a driver
//! accepts them and owns the electrical sequencing.

use crate::control::MotorCommand;

/// Why a driver refused a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Direction reversal requested while the bridge is still
    /// energized. Stop first; the driver inserts the dwell.
    SwitchTooFast,
}

/// A motor that accepts run/stop commands with a polarity.
///
/// `set_command` only records intent; implementations apply it from
/// their periodic update so electrical constraints (reversal dwell,
/// shoot-through protection) live in one place.
pub trait LidMotorDriver {
    /// Record the desired motor state.
    fn set_command(&mut self, command: MotorCommand) -> Result<(), MotorError>;

    /// The last accepted command.
    fn command(&self) -> MotorCommand;

    /// Whether the motor is actually energized right now. Lags the
    /// accepted command while a dwell runs out.
    fn is_running(&self) -> bool;
}
