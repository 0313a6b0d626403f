//! Position sensing task
//!
//! Samples the lid potentiometer via the RP2040 ADC, runs the
//! rail-fault check and median filter, and publishes the latest
//! settled reading in 10-bit counts. A fault publishes `None` so the
//! controller never drives on stale data.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use operculum_drivers::sensor::PotFilter;

use crate::channels::POSITION_READING;

/// Position sampling task
#[embassy_executor::task]
pub async fn position_task(
    mut adc: Adc<'static, Async>,
    mut pot_channel: Channel<'static>,
    sample_ms: u32,
) {
    info!("Position task started");

    let mut filter = PotFilter::new();
    // Fault transitions are logged once, not per sample.
    let mut healthy = true;

    let mut ticker = Ticker::every(Duration::from_millis(sample_ms as u64));

    loop {
        ticker.next().await;

        match adc.read(&mut pot_channel).await {
            Ok(raw) => match filter.push(raw) {
                Ok(counts) => {
                    if !healthy {
                        info!("Position sensor recovered");
                        healthy = true;
                    }
                    POSITION_READING.signal(Some(counts));
                }
                Err(e) => {
                    if healthy {
                        warn!("Position sensor fault: {:?}", e);
                        healthy = false;
                    }
                    filter.reset();
                    POSITION_READING.signal(None);
                }
            },
            Err(_) => {
                if healthy {
                    warn!("ADC read error");
                    healthy = false;
                }
                filter.reset();
                POSITION_READING.signal(None);
            }
        }
    }
}
