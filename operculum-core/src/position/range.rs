//! Sensor band classification
//!
//! The lid position is read from a potentiometer coupled to the
//! mechanism, scaled to 10-bit counts. Each status owns a narrow
//! calibrated band of counts; the gaps between bands are deliberate
//! dead zones that the mechanism sweeps through while moving. A
//! reading inside a gap therefore means "in transit", not an error.

use super::status::{InvalidStatus, LidStatus, MoveDirection};

/// A settled sensor band for one lid status.
///
/// `min_position..=max_position` are inclusive bounds in 10-bit
/// sensor counts. `movement_direction` is the motor polarity
/// conventionally used to approach this band; it is carried with the
/// band so a caller holding a target never has to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidPosition {
    /// Lower inclusive bound of the settled band
    pub min_position: u16,
    /// Upper inclusive bound of the settled band
    pub max_position: u16,
    /// Motor polarity used to approach this band
    pub movement_direction: MoveDirection,
    /// Status this band belongs to
    pub lid_status: LidStatus,
}

impl LidPosition {
    pub const fn new(
        min_position: u16,
        max_position: u16,
        movement_direction: MoveDirection,
        lid_status: LidStatus,
    ) -> Self {
        Self {
            min_position,
            max_position,
            movement_direction,
            lid_status,
        }
    }

    /// Whether a reading has settled inside this band (bounds inclusive).
    pub const fn contains(&self, reading: u16) -> bool {
        self.min_position <= reading && reading <= self.max_position
    }

    /// Center of the band, useful as a nominal stop point.
    pub const fn midpoint(&self) -> u16 {
        (self.min_position + self.max_position) / 2
    }
}

/// Factory band table measured on the reference unit.
///
/// Indexed by `LidStatus as usize`. Note the sensor is not monotonic
/// over the travel: the closed band sits near the top of the scale,
/// the open band near the bottom, and the tilt bands climb again from
/// there. The directions are progression polarities, not sensor count
/// slopes.
pub const POSITION_TABLE: [LidPosition; 5] = [
    LidPosition::new(935, 945, MoveDirection::Backward, LidStatus::Closed),
    LidPosition::new(229, 244, MoveDirection::Forward, LidStatus::Open),
    LidPosition::new(255, 265, MoveDirection::Forward, LidStatus::Tilt0),
    LidPosition::new(295, 305, MoveDirection::Forward, LidStatus::Tilt1),
    LidPosition::new(335, 345, MoveDirection::Forward, LidStatus::Tilt2),
];

impl LidStatus {
    /// The factory band for this status.
    pub const fn position_range(self) -> LidPosition {
        POSITION_TABLE[self as usize]
    }
}

/// Factory band lookup from a raw status byte.
///
/// Entry point for persisted or externally supplied status values;
/// unknown bytes are reported rather than mapped to a default band.
pub fn position_range_from_raw(raw: u8) -> Result<LidPosition, InvalidStatus> {
    LidStatus::try_from(raw).map(LidStatus::position_range)
}

/// Map a raw sensor reading to the status band containing it.
///
/// Returns `None` when the reading falls between bands, which is the
/// normal condition while the lid is moving.
pub fn classify_reading(reading: u16) -> Option<LidStatus> {
    POSITION_TABLE
        .iter()
        .find(|band| band.contains(reading))
        .map(|band| band.lid_status)
}
