//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the tasks: inputs flow
//! into the controller, the controller emits motor commands, and the
//! position task publishes the latest filtered reading.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use operculum_core::control::{InputEvent, MotorCommand};

/// Channel capacity for operator input events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Operator input events (buttons, accessory sense edges)
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Motor command signal (updated by the controller)
pub static MOTOR_CMD: Signal<CriticalSectionRawMutex, MotorCommand> = Signal::new();

/// Latest filtered position reading in 10-bit counts
/// (updated by the position task), or None for a sensor fault
pub static POSITION_READING: Signal<CriticalSectionRawMutex, Option<u16>> = Signal::new();
