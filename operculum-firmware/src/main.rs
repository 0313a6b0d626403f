//! Operculum - Motorized Lid Controller Firmware
//!
//! Main firmware binary for the RP2040-based lid control core. Drives
//! a single DC motor through an H-bridge to open, tilt, and close a
//! hinged enclosure lid, tracking position with a potentiometer
//! coupled to the hinge.
//!
//! Named after the Latin "operculum" meaning "little lid" - the
//! hinged cover this firmware moves through its stages.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use operculum_core::config::LidConfig;
use operculum_drivers::button::DebouncedButton;
use operculum_drivers::motor::HBridgeConfig;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cell for the board configuration (task references live forever)
static LID_CONFIG: StaticCell<LidConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Operculum firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Board wiring and timings; the pin setup below must match it
    let lid_config: &'static LidConfig = LID_CONFIG.init(config::board_config());

    // Load band calibration from the last flash sector
    let calibration = config::load_calibration(p.FLASH);

    // Setup operator inputs
    // Reference board: open/close GPIO10, tilt GPIO11 (active-low,
    // pulled up), accessory sense GPIO12 (active-high, pulled down)
    let debounce = lid_config.timings.debounce_threshold();
    let open_close = DebouncedButton::active_low(Input::new(p.PIN_10, Pull::Up), debounce);
    let tilt = DebouncedButton::active_low(Input::new(p.PIN_11, Pull::Up), debounce);
    let accessory = DebouncedButton::active_high(Input::new(p.PIN_12, Pull::Down), debounce);

    info!("Operator inputs initialized");

    // Setup ADC for position sensing
    // Reference board: pot wiper on GPIO26 (ADC channel 0)
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let pot_channel = Channel::new_pin(p.PIN_26, Pull::None);

    info!("Position ADC initialized");

    // Setup H-bridge outputs, both low (motor de-energized)
    // Reference board: open side GPIO14, close side GPIO15
    let motor_open = Output::new(p.PIN_14, Level::Low);
    let motor_close = Output::new(p.PIN_15, Level::Low);
    let hbridge_config = HBridgeConfig {
        min_reverse_delay_ms: lid_config.timings.min_reverse_delay_ms,
    };

    info!("Motor outputs initialized");

    // Spawn tasks
    spawner
        .spawn(tasks::tick_task(lid_config.timings.control_tick_ms))
        .unwrap();
    spawner
        .spawn(tasks::buttons_task(
            open_close,
            tilt,
            accessory,
            lid_config.timings.button_poll_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::position_task(
            adc,
            pot_channel,
            lid_config.timings.position_sample_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::motor_task(
            motor_open,
            motor_close,
            hbridge_config,
            lid_config.timings.motor_update_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::controller_task(lid_config, calibration))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
