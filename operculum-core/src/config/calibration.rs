//! Persisted band calibration
//!
//! The factory band table suits the reference mechanism, but linkage
//! tolerances shift the bands a little from unit to unit. A calibrated
//! table can be persisted (postcard-encoded, CRC-protected) and loaded
//! at boot; anything that fails validation falls back to the factory
//! table.

use crate::position::{LidPosition, LidStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Magic number identifying a calibration record ("OPCL").
pub const CALIBRATION_MAGIC: u32 = 0x4F50_434C;

/// Layout version, bumped on incompatible changes.
pub const CALIBRATION_VERSION: u16 = 1;

/// One settled band in 10-bit sensor counts, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Band {
    pub min: u16,
    pub max: u16,
}

/// Why a stored calibration record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Magic number mismatch (blank or foreign sector)
    BadMagic,
    /// Unsupported layout version
    BadVersion,
    /// Checksum mismatch (partial write or bit rot)
    BadCrc,
    /// A band with min >= max
    InvertedBand(LidStatus),
    /// Two bands share readings, making classification ambiguous
    OverlappingBands(LidStatus, LidStatus),
}

/// Calibrated band table with integrity framing.
///
/// Bands are indexed by `LidStatus as usize`. Directions are not
/// stored: they are a property of the progression, not of the unit,
/// and are re-attached from the factory table on lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LidCalibration {
    pub magic: u32,
    pub version: u16,
    pub bands: [Band; 5],
    pub crc: u32,
}

impl LidCalibration {
    /// Upper bound on the postcard encoding, for sizing buffers.
    pub const ENCODED_CAPACITY: usize = 48;

    /// The factory band table with a valid checksum.
    pub fn factory() -> Self {
        let mut bands = [Band { min: 0, max: 0 }; 5];
        for status in LidStatus::ALL {
            let range = status.position_range();
            bands[status as usize] = Band {
                min: range.min_position,
                max: range.max_position,
            };
        }

        let mut calibration = Self {
            magic: CALIBRATION_MAGIC,
            version: CALIBRATION_VERSION,
            bands,
            crc: 0,
        };
        calibration.update_crc();
        calibration
    }

    /// CRC-32 (IEEE) over everything except the crc field itself.
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &self.version.to_le_bytes());
        for band in &self.bands {
            crc = crc32_update(crc, &band.min.to_le_bytes());
            crc = crc32_update(crc, &band.max.to_le_bytes());
        }
        !crc
    }

    /// Recompute and store the checksum after edits.
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Full integrity and consistency check.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.magic != CALIBRATION_MAGIC {
            return Err(CalibrationError::BadMagic);
        }
        if self.version != CALIBRATION_VERSION {
            return Err(CalibrationError::BadVersion);
        }
        if self.crc != self.calculate_crc() {
            return Err(CalibrationError::BadCrc);
        }

        for status in LidStatus::ALL {
            let band = self.bands[status as usize];
            if band.min >= band.max {
                return Err(CalibrationError::InvertedBand(status));
            }
        }

        // Overlapping bands would classify one reading as two statuses.
        for (i, &a) in LidStatus::ALL.iter().enumerate() {
            for &b in &LidStatus::ALL[i + 1..] {
                let band_a = self.bands[a as usize];
                let band_b = self.bands[b as usize];
                if band_a.min <= band_b.max && band_b.min <= band_a.max {
                    return Err(CalibrationError::OverlappingBands(a, b));
                }
            }
        }

        Ok(())
    }

    /// The calibrated band for a status, with its progression
    /// direction re-attached.
    pub fn band_for(&self, status: LidStatus) -> LidPosition {
        let band = self.bands[status as usize];
        LidPosition::new(
            band.min,
            band.max,
            status.position_range().movement_direction,
            status,
        )
    }

    /// Map a reading to the calibrated band containing it, `None` when
    /// the lid is between bands.
    pub fn classify(&self, reading: u16) -> Option<LidStatus> {
        LidStatus::ALL
            .into_iter()
            .find(|&status| self.band_for(status).contains(reading))
    }

    /// Postcard-encode into `buf`, returning the used prefix.
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Decode a postcard record. Trailing bytes (the rest of a flash
    /// sector) are ignored. Always [`validate`](Self::validate) the
    /// result before use.
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl Default for LidCalibration {
    fn default() -> Self {
        Self::factory()
    }
}

/// One step of the bitwise CRC-32 (IEEE 802.3, reflected).
fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::MoveDirection;

    #[test]
    fn test_factory_calibration_is_valid() {
        assert_eq!(LidCalibration::factory().validate(), Ok(()));
    }

    #[test]
    fn test_factory_matches_position_table() {
        let calibration = LidCalibration::factory();
        for status in LidStatus::ALL {
            assert_eq!(calibration.band_for(status), status.position_range());
        }
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut calibration = LidCalibration::factory();
        calibration.magic = 0xFFFF_FFFF;
        calibration.update_crc();
        assert_eq!(calibration.validate(), Err(CalibrationError::BadMagic));
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut calibration = LidCalibration::factory();
        calibration.version = CALIBRATION_VERSION + 1;
        calibration.update_crc();
        assert_eq!(calibration.validate(), Err(CalibrationError::BadVersion));
    }

    #[test]
    fn test_corrupt_data_fails_crc() {
        let mut calibration = LidCalibration::factory();
        calibration.bands[0].min += 1;
        assert_eq!(calibration.validate(), Err(CalibrationError::BadCrc));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut calibration = LidCalibration::factory();
        calibration.bands[LidStatus::Open as usize] = Band { min: 244, max: 229 };
        calibration.update_crc();
        assert_eq!(
            calibration.validate(),
            Err(CalibrationError::InvertedBand(LidStatus::Open))
        );
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let mut calibration = LidCalibration::factory();
        // Stretch the open band into the first tilt band.
        calibration.bands[LidStatus::Open as usize].max = 256;
        calibration.update_crc();
        assert_eq!(
            calibration.validate(),
            Err(CalibrationError::OverlappingBands(
                LidStatus::Open,
                LidStatus::Tilt0
            ))
        );
    }

    #[test]
    fn test_calibrated_bands_shift_classification() {
        let mut calibration = LidCalibration::factory();
        // A unit whose open band sits 6 counts higher than factory.
        calibration.bands[LidStatus::Open as usize] = Band { min: 235, max: 250 };
        calibration.update_crc();
        assert_eq!(calibration.validate(), Ok(()));

        assert_eq!(calibration.classify(248), Some(LidStatus::Open));
        assert_eq!(calibration.classify(232), None);
        // Factory table is untouched.
        assert_eq!(crate::position::classify_reading(248), None);
    }

    #[test]
    fn test_band_for_keeps_progression_direction() {
        let mut calibration = LidCalibration::factory();
        calibration.bands[LidStatus::Closed as usize] = Band { min: 930, max: 950 };
        calibration.update_crc();

        let band = calibration.band_for(LidStatus::Closed);
        assert_eq!(band.movement_direction, MoveDirection::Backward);
        assert_eq!(band.min_position, 930);
        assert_eq!(band.max_position, 950);
    }

    #[test]
    fn test_crc_is_order_sensitive() {
        let mut a = LidCalibration::factory();
        let mut b = LidCalibration::factory();
        a.bands[0] = Band { min: 10, max: 20 };
        b.bands[0] = Band { min: 20, max: 10 };
        assert_ne!(a.calculate_crc(), b.calculate_crc());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_encode_decode_round_trip() {
        let calibration = LidCalibration::factory();
        let mut buf = [0u8; LidCalibration::ENCODED_CAPACITY];

        let used = calibration.encode(&mut buf).unwrap().len();
        assert!(used <= LidCalibration::ENCODED_CAPACITY);

        let decoded = LidCalibration::decode(&buf).unwrap();
        assert_eq!(decoded, calibration);
        assert_eq!(decoded.validate(), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decode_blank_sector_fails() {
        // Erased flash reads all ones; the varint decoder must not
        // produce a record from it.
        let blank = [0xFFu8; LidCalibration::ENCODED_CAPACITY];
        assert!(LidCalibration::decode(&blank).is_err());
    }
}
