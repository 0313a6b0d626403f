//! Potentiometer position sensor
//!
//! The lid position comes from a potentiometer coupled to the hinge,
//! read by the 12-bit ADC and scaled down to the 10-bit counts the
//! band tables use. Readings pinned to either supply rail mean a
//! broken wiper or a shorted divider, not a position; they are
//! reported as faults so the control loop can stop the motor instead
//! of chasing a dead sensor.

use heapless::HistoryBuffer;

/// Full scale of the ADC (12-bit).
pub const ADC_MAX: u16 = 4096;

/// Counts of slack against each rail before a reading is a fault.
const RAIL_MARGIN: u16 = 10;

/// Samples in the median filter window.
pub const MEDIAN_WINDOW: usize = 5;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read a raw ADC value (12-bit: 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Position sensor fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Reading pinned at the high rail: wiper or ground leg broken
    OpenCircuit,
    /// Reading pinned at the low rail: divider shorted
    ShortCircuit,
    /// The ADC conversion itself failed
    ConversionFailed,
}

/// Rail checking, scaling and median filtering for raw pot readings.
///
/// Feed raw 12-bit conversions with [`push`](Self::push); get back the
/// median of the recent window in 10-bit counts. The window is short
/// enough to track the moving lid and long enough to drop single-sample
/// spikes from motor brush noise.
pub struct PotFilter {
    samples: HistoryBuffer<u16, MEDIAN_WINDOW>,
}

impl PotFilter {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Validate a raw conversion against the supply rails.
    pub fn check_rails(raw: u16) -> Result<u16, SensorError> {
        if raw >= ADC_MAX - RAIL_MARGIN {
            return Err(SensorError::OpenCircuit);
        }
        if raw < RAIL_MARGIN {
            return Err(SensorError::ShortCircuit);
        }
        Ok(raw)
    }

    /// Scale a 12-bit conversion to the 10-bit counts of the band tables.
    pub const fn scale_to_counts(raw: u16) -> u16 {
        raw >> 2
    }

    /// Fold in one raw conversion and return the filtered position.
    pub fn push(&mut self, raw: u16) -> Result<u16, SensorError> {
        let raw = Self::check_rails(raw)?;
        self.samples.write(Self::scale_to_counts(raw));
        Ok(self.median())
    }

    /// Drop the window, e.g. after a fault or a long idle gap, so
    /// stale samples cannot skew the next readings.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    fn median(&self) -> u16 {
        let mut sorted = [0u16; MEDIAN_WINDOW];
        let mut n = 0;
        for &sample in self.samples.oldest_ordered() {
            sorted[n] = sample;
            n += 1;
        }
        let window = &mut sorted[..n];
        window.sort_unstable();
        window[n / 2]
    }
}

impl Default for PotFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete position sensor over a blocking [`AdcReader`].
pub struct PotPositionSensor<A: AdcReader> {
    adc: A,
    filter: PotFilter,
}

impl<A: AdcReader> PotPositionSensor<A> {
    pub fn new(adc: A) -> Self {
        Self {
            adc,
            filter: PotFilter::new(),
        }
    }

    /// One conversion through the filter, in 10-bit counts.
    pub fn sample(&mut self) -> Result<u16, SensorError> {
        let raw = self.adc.read().map_err(|_| SensorError::ConversionFailed)?;
        self.filter.push(raw)
    }

    /// Drop the filter window.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}
