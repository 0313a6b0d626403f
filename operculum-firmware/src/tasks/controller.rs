//! Main controller task
//!
//! Coordinates the decision core and the travel watchdog. Receives
//! input events and tick signals, picks up the latest position
//! reading, and publishes motor commands on change.

use defmt::*;
use embassy_futures::select::{select, Either};

use operculum_core::config::{LidCalibration, LidConfig};
use operculum_core::control::{LidController, MotorCommand};
use operculum_core::safety::TravelMonitor;

use crate::channels::{INPUT_CHANNEL, MOTOR_CMD, POSITION_READING};
use crate::tasks::tick::TICK_SIGNAL;

/// Controller task - main coordination loop
///
/// Input events are recorded as they arrive; decisions happen on the
/// tick so button handling, band classification, and the watchdog all
/// see one consistent snapshot.
#[embassy_executor::task]
pub async fn controller_task(config: &'static LidConfig, calibration: LidCalibration) {
    info!("Controller task started");

    let mut controller = LidController::new(calibration);
    let mut monitor = TravelMonitor::new(config.timings.travel());

    let mut last_reading: Option<u16> = None;
    let mut last_tick_ms: u32 = 0;
    let mut last_command = MotorCommand::stopped();

    // Make sure the bridge starts de-energized.
    MOTOR_CMD.signal(last_command);

    loop {
        match select(INPUT_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(event) => {
                debug!("Input: {:?}", event);
                controller.handle_event(event);
            }

            Either::Second(now_ms) => {
                let delta_ms = now_ms.wrapping_sub(last_tick_ms);
                last_tick_ms = now_ms;

                // Keep the previous reading when the sampler has not
                // published since the last tick.
                if let Some(reading) = POSITION_READING.try_take() {
                    last_reading = reading;
                }

                let before = controller.lid_status();
                let mut command = controller.update(last_reading);

                // The watchdog only accumulates while the motor is
                // commanded on; a stopped lid is never stalled.
                if command.running {
                    if let Some(raw) = last_reading {
                        if let Some(fault) = monitor.update(raw, delta_ms) {
                            warn!("Travel fault: {:?}, aborting motion", fault);
                            controller.abort();
                            monitor.reset();
                            command = MotorCommand::stopped();
                        }
                    }
                } else {
                    monitor.reset();
                }

                let after = controller.lid_status();
                if after != before {
                    info!("Lid status: {:?} -> {:?}", before, after);
                }

                if command != last_command {
                    debug!("Motor command: {:?}", command);
                    MOTOR_CMD.signal(command);
                    last_command = command;
                }
            }
        }
    }
}
