//! Travel watchdog
//!
//! Supervises a motion in progress using only time and the position
//! reading. Two fault conditions:
//!
//! - `Timeout`: the motor has been commanded for longer than any valid
//!   travel can take.
//! - `Stalled`: the reading has stopped changing while the motor runs,
//!   which points at a jammed mechanism or a slipped coupling.
//!
//! The monitor is fed once per control tick while the motor runs and
//! must be reset whenever the motor stops.

use heapless::HistoryBuffer;

/// Samples kept for stall detection. With the default window interval
/// this spans one second of travel.
const TRAVEL_WINDOW: usize = 4;

/// Travel supervision limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TravelConfig {
    /// Longest acceptable single travel in milliseconds
    pub max_travel_ms: u32,
    /// Minimum sensor counts the reading must span per full window
    pub min_progress: u16,
    /// Interval between stall samples in milliseconds
    pub window_ms: u32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            max_travel_ms: 12_000,
            min_progress: 3,
            window_ms: 250,
        }
    }
}

/// Why a travel was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TravelFault {
    /// The travel exceeded `max_travel_ms`
    Timeout,
    /// The reading stopped changing while the motor was commanded
    Stalled,
}

/// Watchdog over one motion. Create once, feed while the motor runs,
/// reset on every stop.
pub struct TravelMonitor {
    config: TravelConfig,
    elapsed_ms: u32,
    window_elapsed_ms: u32,
    window: HistoryBuffer<u16, TRAVEL_WINDOW>,
}

impl TravelMonitor {
    pub fn new(config: TravelConfig) -> Self {
        Self {
            config,
            elapsed_ms: 0,
            window_elapsed_ms: 0,
            window: HistoryBuffer::new(),
        }
    }

    /// Feed one control tick spent running. Returns a fault until the
    /// caller stops the motor and resets the monitor.
    pub fn update(&mut self, reading: u16, delta_ms: u32) -> Option<TravelFault> {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms >= self.config.max_travel_ms {
            return Some(TravelFault::Timeout);
        }

        self.window_elapsed_ms = self.window_elapsed_ms.saturating_add(delta_ms);
        if self.window_elapsed_ms >= self.config.window_ms {
            self.window_elapsed_ms = 0;
            self.window.write(reading);

            if self.window.len() == TRAVEL_WINDOW && self.window_span() < self.config.min_progress {
                return Some(TravelFault::Stalled);
            }
        }

        None
    }

    /// Forget the travel in progress. Call whenever the motor stops.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.window_elapsed_ms = 0;
        self.window.clear();
    }

    /// Time spent on the current travel.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    fn window_span(&self) -> u16 {
        let mut min = u16::MAX;
        let mut max = 0;
        for &sample in self.window.oldest_ordered() {
            min = min.min(sample);
            max = max.max(sample);
        }
        max.saturating_sub(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> TravelMonitor {
        TravelMonitor::new(TravelConfig::default())
    }

    #[test]
    fn test_healthy_travel_reports_nothing() {
        let mut m = monitor();
        let mut reading = 240;

        // Sweeping ~35 counts per window, well above the threshold.
        for _ in 0..20 {
            assert_eq!(m.update(reading, 250), None);
            reading += 35;
        }
    }

    #[test]
    fn test_timeout_after_max_travel() {
        let mut m = monitor();
        assert_eq!(m.update(300, 4_000), None);
        assert_eq!(m.update(400, 4_000), None);
        assert_eq!(m.update(500, 4_000), Some(TravelFault::Timeout));
    }

    #[test]
    fn test_stall_on_static_reading() {
        let mut m = monitor();
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(500, 250), None);
        // Fourth sample fills the window with no movement.
        assert_eq!(m.update(500, 250), Some(TravelFault::Stalled));
    }

    #[test]
    fn test_partial_window_never_stalls() {
        let mut m = monitor();
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(500, 250), None);
    }

    #[test]
    fn test_progress_at_threshold_is_not_a_stall() {
        let mut m = monitor();
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(501, 250), None);
        assert_eq!(m.update(502, 250), None);
        // Span is exactly min_progress: still making (slow) progress.
        assert_eq!(m.update(503, 250), None);
    }

    #[test]
    fn test_progress_below_threshold_stalls() {
        let mut m = monitor();
        assert_eq!(m.update(500, 250), None);
        assert_eq!(m.update(501, 250), None);
        assert_eq!(m.update(501, 250), None);
        assert_eq!(m.update(502, 250), Some(TravelFault::Stalled));
    }

    #[test]
    fn test_samples_only_on_window_boundaries() {
        let mut m = monitor();
        // 1 ms ticks: a static reading must not stall before four full
        // window intervals have passed.
        for _ in 0..999 {
            assert_eq!(m.update(500, 1), None);
        }
        assert_eq!(m.update(500, 1), Some(TravelFault::Stalled));
    }

    #[test]
    fn test_reset_clears_both_conditions() {
        let mut m = monitor();
        for _ in 0..3 {
            m.update(500, 250);
        }
        assert_eq!(m.update(500, 250), Some(TravelFault::Stalled));

        m.reset();
        assert_eq!(m.elapsed_ms(), 0);
        assert_eq!(m.update(500, 250), None);

        m.update(500, 11_000);
        m.reset();
        assert_eq!(m.update(500, 250), None);
    }
}
