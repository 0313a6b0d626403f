//! Board configuration and calibration loading
//!
//! The board wiring and timings come from the reference-board defaults
//! in operculum-core; the band calibration is read from the last flash
//! sector, where the service tool writes it, with the factory table as
//! fallback.

use defmt::*;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;

use operculum_core::config::{LidCalibration, LidConfig};

/// Flash size of the reference board (W25Q16, 2 MiB).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash sector size; erases happen in these units.
pub const SECTOR_SIZE: usize = 4096;

/// The calibration record lives in the last sector, outside the
/// program image (memory.x keeps the linker away from it).
pub const CALIBRATION_OFFSET: u32 = (FLASH_SIZE - SECTOR_SIZE) as u32;

/// Board wiring and loop timings.
///
/// Pin assignments here are documentation; the GPIO setup in main.rs
/// must match them.
pub fn board_config() -> LidConfig {
    LidConfig::reference_board()
}

/// Read the band calibration from flash, falling back to the factory
/// table when the sector is blank, torn, or fails validation.
pub fn load_calibration(flash: Peri<'static, FLASH>) -> LidCalibration {
    let mut flash: Flash<'_, FLASH, Blocking, FLASH_SIZE> = Flash::new_blocking(flash);

    let mut buf = [0u8; LidCalibration::ENCODED_CAPACITY];
    if let Err(e) = flash.blocking_read(CALIBRATION_OFFSET, &mut buf) {
        warn!("Calibration read failed: {:?}, using factory bands", e);
        return LidCalibration::factory();
    }

    match LidCalibration::decode(&buf) {
        Ok(calibration) => match calibration.validate() {
            Ok(()) => {
                info!("Loaded band calibration from flash");
                calibration
            }
            Err(e) => {
                warn!("Stored calibration invalid: {:?}, using factory bands", e);
                LidCalibration::factory()
            }
        },
        Err(_) => {
            info!("No calibration record in flash, using factory bands");
            LidCalibration::factory()
        }
    }
}
