//! Button input task
//!
//! Polls the two operator buttons and the accessory sense line through
//! the debouncer and forwards edges to the controller as input events.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use operculum_core::control::InputEvent;
use operculum_drivers::button::{ButtonEdge, DebouncedButton};

use crate::channels::INPUT_CHANNEL;

/// Button polling task
///
/// The buttons report presses only; the accessory sense line reports
/// both edges so the controller sees the accessory being unplugged.
#[embassy_executor::task]
pub async fn buttons_task(
    mut open_close: DebouncedButton<Input<'static>>,
    mut tilt: DebouncedButton<Input<'static>>,
    mut accessory: DebouncedButton<Input<'static>>,
    poll_ms: u32,
) {
    info!("Buttons task started");

    let mut ticker = Ticker::every(Duration::from_millis(poll_ms as u64));

    loop {
        ticker.next().await;

        // GPIO reads are infallible on this target.
        if let Ok(Some(ButtonEdge::Pressed)) = open_close.poll() {
            send(InputEvent::OpenClose);
        }
        if let Ok(Some(ButtonEdge::Pressed)) = tilt.poll() {
            send(InputEvent::Tilt);
        }
        match accessory.poll() {
            Ok(Some(ButtonEdge::Pressed)) => send(InputEvent::AccessoryOn),
            Ok(Some(ButtonEdge::Released)) => send(InputEvent::AccessoryOff),
            _ => {}
        }
    }
}

/// Forward an event to the controller, dropping it when the queue is
/// full.
fn send(event: InputEvent) {
    if INPUT_CHANNEL.try_send(event).is_err() {
        warn!("Input queue full, dropping {:?}", event);
    }
}
