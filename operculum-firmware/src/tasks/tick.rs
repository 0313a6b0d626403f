//! Tick task for time-based updates
//!
//! Provides the controller's time base: the periodic decision step and
//! the travel watchdog accounting both run off this signal.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Signal to notify the controller of a tick, carrying elapsed ms
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with a timestamp
#[embassy_executor::task]
pub async fn tick_task(tick_ms: u32) {
    info!("Tick task started ({}ms interval)", tick_ms);

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        // Elapsed time since boot in milliseconds; wraps after ~49 days
        let now_ms = start.elapsed().as_millis() as u32;

        TICK_SIGNAL.signal(now_ms);
    }
}
