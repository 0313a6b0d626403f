//! H-bridge DC motor driver
//!
//! Drives the lid motor through a two-input H-bridge (one GPIO per
//! bridge side). Commands only record intent; the periodic update
//! applies them, so every electrical constraint is enforced in one
//! place:
//!
//! - A direction reversal is refused while the bridge is energized
//!   ([`MotorError::SwitchTooFast`]); callers stop first.
//! - After a stop, the opposite side is only energized once a both-low
//!   dwell has run out, letting the flyback current decay.
//! - Stops always apply immediately.
//!
//! # Usage
//!
//! ```ignore
//! let mut motor = HBridgeMotor::new(open_pin, close_pin, HBridgeConfig::default());
//!
//! motor.set_command(MotorCommand::run(MoveDirection::Forward))?;
//! loop {
//!     motor.update()?; // call every 1ms
//! }
//! ```
//!
//! # Safety
//!
//! Never drive both bridge inputs high: that shorts the supply through
//! the bridge (shoot-through). The driver writes the low side before
//! the high side on every transition and both pins are expected to
//! start low.

use embedded_hal::digital::OutputPin;

use operculum_core::control::MotorCommand;
use operculum_core::position::MoveDirection;
use operculum_core::traits::{LidMotorDriver, MotorError};

/// H-bridge timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Both-low dwell between de-energizing one side and energizing
    /// the other, in milliseconds
    pub min_reverse_delay_ms: u32,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            min_reverse_delay_ms: 250,
        }
    }
}

/// Two-pin H-bridge driver.
///
/// `Forward` energizes the open side, `Backward` the close side,
/// matching the progression polarity of the lid. Construct with both
/// pins low.
pub struct HBridgeMotor<P: OutputPin> {
    open_side: P,
    close_side: P,
    config: HBridgeConfig,
    desired: MotorCommand,
    /// Direction currently energized, `None` while both sides are low
    energized: Option<MoveDirection>,
    /// Direction of the most recent run, for dwell exemption
    last_direction: MoveDirection,
    dwell_remaining_ms: u32,
}

impl<P: OutputPin> HBridgeMotor<P> {
    pub fn new(open_side: P, close_side: P, config: HBridgeConfig) -> Self {
        Self {
            open_side,
            close_side,
            config,
            desired: MotorCommand::stopped(),
            energized: None,
            last_direction: MoveDirection::Forward,
            dwell_remaining_ms: 0,
        }
    }

    /// Advance the state machine by 1ms and apply pin levels.
    pub fn update(&mut self) -> Result<(), P::Error> {
        self.update_with_delta(1)
    }

    /// Advance the state machine by `delta_ms` and apply pin levels.
    pub fn update_with_delta(&mut self, delta_ms: u32) -> Result<(), P::Error> {
        if self.dwell_remaining_ms > 0 {
            self.dwell_remaining_ms = self.dwell_remaining_ms.saturating_sub(delta_ms);
        }

        if !self.desired.running {
            if self.energized.is_some() {
                self.apply_idle()?;
                self.energized = None;
                // Hold off a reversal until the windings have settled.
                self.dwell_remaining_ms = self.config.min_reverse_delay_ms;
            }
            return Ok(());
        }

        if self.energized == Some(self.desired.direction) {
            return Ok(());
        }

        // Restarting the previous direction is safe at once; the
        // opposite direction waits out the dwell.
        if self.desired.direction != self.last_direction && self.dwell_remaining_ms > 0 {
            return Ok(());
        }

        self.apply_drive(self.desired.direction)?;
        self.energized = Some(self.desired.direction);
        self.last_direction = self.desired.direction;
        Ok(())
    }

    /// Time left before an opposite-direction start may energize.
    pub fn dwell_remaining_ms(&self) -> u32 {
        self.dwell_remaining_ms
    }

    fn apply_idle(&mut self) -> Result<(), P::Error> {
        self.open_side.set_low()?;
        self.close_side.set_low()
    }

    fn apply_drive(&mut self, direction: MoveDirection) -> Result<(), P::Error> {
        // Low side first, so both inputs are never high together.
        match direction {
            MoveDirection::Forward => {
                self.close_side.set_low()?;
                self.open_side.set_high()
            }
            MoveDirection::Backward => {
                self.open_side.set_low()?;
                self.close_side.set_high()
            }
        }
    }
}

impl<P: OutputPin> LidMotorDriver for HBridgeMotor<P> {
    fn set_command(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        if command.running {
            if let Some(active) = self.energized {
                if active != command.direction {
                    return Err(MotorError::SwitchTooFast);
                }
            }
        }
        self.desired = command;
        Ok(())
    }

    fn command(&self) -> MotorCommand {
        self.desired
    }

    fn is_running(&self) -> bool {
        self.energized.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct PinState {
        high: Cell<bool>,
    }

    struct FakePin<'a>(&'a PinState);

    impl ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for FakePin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.high.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.high.set(true);
            Ok(())
        }
    }

    fn motor<'a>(open: &'a PinState, close: &'a PinState) -> HBridgeMotor<FakePin<'a>> {
        HBridgeMotor::new(
            FakePin(open),
            FakePin(close),
            HBridgeConfig {
                min_reverse_delay_ms: 100,
            },
        )
    }

    #[test]
    fn test_starts_idle() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        assert!(!m.is_running());
        m.update().unwrap();
        assert!(!open.high.get());
        assert!(!close.high.get());
    }

    #[test]
    fn test_forward_energizes_open_side() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        assert!(!m.is_running());

        m.update().unwrap();
        assert!(m.is_running());
        assert!(open.high.get());
        assert!(!close.high.get());
    }

    #[test]
    fn test_backward_energizes_close_side() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Backward)).unwrap();
        m.update().unwrap();
        assert!(!open.high.get());
        assert!(close.high.get());
    }

    #[test]
    fn test_stop_applies_immediately() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();

        m.set_command(MotorCommand::stopped()).unwrap();
        m.update().unwrap();
        assert!(!m.is_running());
        assert!(!open.high.get());
        assert!(!close.high.get());
    }

    #[test]
    fn test_reversal_refused_while_energized() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();

        assert_eq!(
            m.set_command(MotorCommand::run(MoveDirection::Backward)),
            Err(MotorError::SwitchTooFast)
        );
        // The refused command must not disturb the bridge.
        m.update().unwrap();
        assert!(open.high.get());
        assert!(!close.high.get());
    }

    #[test]
    fn test_reversal_waits_out_dwell() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::stopped()).unwrap();
        m.update().unwrap();

        // Accepted now that the bridge is off, but held both-low until
        // the dwell has run out.
        m.set_command(MotorCommand::run(MoveDirection::Backward)).unwrap();
        assert!(m.command().running);

        m.update_with_delta(50).unwrap();
        assert!(!m.is_running());
        assert!(!open.high.get());
        assert!(!close.high.get());

        m.update_with_delta(50).unwrap();
        assert!(m.is_running());
        assert!(!open.high.get());
        assert!(close.high.get());
    }

    #[test]
    fn test_same_direction_restart_is_immediate() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::stopped()).unwrap();
        m.update().unwrap();

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();
        assert!(m.is_running());
        assert!(open.high.get());
        assert!(m.dwell_remaining_ms() > 0);
    }

    #[test]
    fn test_command_leads_energization() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::stopped()).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::run(MoveDirection::Backward)).unwrap();
        m.update().unwrap();

        // Dwelling: the accepted command is visible before the bridge is.
        assert_eq!(m.command(), MotorCommand::run(MoveDirection::Backward));
        assert!(!m.is_running());
    }

    #[test]
    fn test_millisecond_updates_complete_a_reversal() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        m.set_command(MotorCommand::run(MoveDirection::Forward)).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::stopped()).unwrap();
        m.update().unwrap();
        m.set_command(MotorCommand::run(MoveDirection::Backward)).unwrap();

        for _ in 0..99 {
            m.update().unwrap();
            assert!(!m.is_running());
        }
        m.update().unwrap();
        assert!(m.is_running());
        assert!(close.high.get());
    }

    #[test]
    fn test_sides_are_never_high_together() {
        let (open, close) = (PinState::default(), PinState::default());
        let mut m = motor(&open, &close);

        let steps = [
            MotorCommand::run(MoveDirection::Forward),
            MotorCommand::stopped(),
            MotorCommand::run(MoveDirection::Backward),
            MotorCommand::stopped(),
            MotorCommand::run(MoveDirection::Forward),
        ];
        for command in steps {
            m.set_command(command).unwrap();
            for _ in 0..150 {
                m.update().unwrap();
                assert!(!(open.high.get() && close.high.get()));
            }
        }
    }
}
