//! Motor output task
//!
//! Applies controller motor commands to the H-bridge driver and runs
//! its dwell state machine at a fast, fixed rate.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use operculum_core::control::MotorCommand;
use operculum_core::traits::{LidMotorDriver, MotorError};
use operculum_drivers::motor::{HBridgeConfig, HBridgeMotor};

use crate::channels::MOTOR_CMD;

/// Motor control task
///
/// A command that would reverse an energized bridge is refused by the
/// driver; the task commands a stop instead and retries the refused
/// command once the bridge has de-energized.
#[embassy_executor::task]
pub async fn motor_task(
    motor_open: Output<'static>,
    motor_close: Output<'static>,
    config: HBridgeConfig,
    update_ms: u32,
) {
    info!("Motor task started");

    let mut motor = HBridgeMotor::new(motor_open, motor_close, config);

    // A refused command stays pending until the driver accepts it.
    let mut pending: Option<MotorCommand> = None;

    let mut ticker = Ticker::every(Duration::from_millis(update_ms as u64));

    loop {
        if let Some(cmd) = MOTOR_CMD.try_take() {
            trace!("Motor command: {:?}", cmd);
            pending = Some(cmd);
        }

        if let Some(cmd) = pending {
            match motor.set_command(cmd) {
                Ok(()) => pending = None,
                Err(MotorError::SwitchTooFast) => {
                    debug!("Reversal while energized: stopping first");
                    // Stop commands are always accepted.
                    let _ = motor.set_command(MotorCommand::stopped());
                }
            }
        }

        // Output pins are infallible on this target.
        let _ = motor.update_with_delta(update_ms);

        ticker.next().await;
    }
}
