//! Discrete lid status model
//!
//! The lid mechanism settles in one of five positions along a single
//! physical travel: fully closed, fully open, and three tilt stages
//! past open. Statuses are ordered by that travel, so "one step
//! forward" is always well defined.

/// Discrete resting statuses of the lid, in progression order.
///
/// The raw values are a wire/persistence contract shared with the
/// calibration record and the service tooling; they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LidStatus {
    /// Lid fully closed
    Closed = 0,
    /// Lid fully open, not tilted
    Open = 1,
    /// First tilt stage
    Tilt0 = 2,
    /// Second tilt stage
    Tilt1 = 3,
    /// Third tilt stage (maximum tilt)
    Tilt2 = 4,
}

/// Motor polarity relative to the status progression.
///
/// `Forward` advances the lid along Closed → Open → Tilt0 → Tilt1 →
/// Tilt2, `Backward` retreats. The position sensor is not monotonic
/// over the travel (the closed band sits above the open band), so
/// directions are fixed per target and never derived from reading
/// deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MoveDirection {
    /// Advance along the progression (open, then tilt further)
    Forward = 0,
    /// Retreat along the progression (untilt, then close)
    Backward = 1,
}

/// A status byte outside the five recognized values.
///
/// Carries the offending byte for logging. Only raw bytes can be
/// invalid; a `LidStatus` value is valid by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidStatus(pub u8);

impl LidStatus {
    /// All statuses in progression order.
    pub const ALL: [LidStatus; 5] = [
        LidStatus::Closed,
        LidStatus::Open,
        LidStatus::Tilt0,
        LidStatus::Tilt1,
        LidStatus::Tilt2,
    ];

    /// The raw byte used in persisted records.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// The next status along the progression, or `None` at `Tilt2`.
    pub const fn next(self) -> Option<LidStatus> {
        match self {
            LidStatus::Closed => Some(LidStatus::Open),
            LidStatus::Open => Some(LidStatus::Tilt0),
            LidStatus::Tilt0 => Some(LidStatus::Tilt1),
            LidStatus::Tilt1 => Some(LidStatus::Tilt2),
            LidStatus::Tilt2 => None,
        }
    }

    /// The previous status along the progression, or `None` at `Closed`.
    pub const fn previous(self) -> Option<LidStatus> {
        match self {
            LidStatus::Closed => None,
            LidStatus::Open => Some(LidStatus::Closed),
            LidStatus::Tilt0 => Some(LidStatus::Open),
            LidStatus::Tilt1 => Some(LidStatus::Tilt0),
            LidStatus::Tilt2 => Some(LidStatus::Tilt1),
        }
    }

    /// The next status, holding at `Tilt2` instead of wrapping.
    ///
    /// Tilt stages are visited strictly in sequence; there is no wrap
    /// back to `Closed`.
    pub const fn next_or_hold(self) -> LidStatus {
        match self.next() {
            Some(next) => next,
            None => self,
        }
    }

    /// The previous status, holding at `Closed`.
    pub const fn previous_or_hold(self) -> LidStatus {
        match self.previous() {
            Some(previous) => previous,
            None => self,
        }
    }

    /// True for the three tilt stages.
    pub const fn is_tilted(self) -> bool {
        matches!(self, LidStatus::Tilt0 | LidStatus::Tilt1 | LidStatus::Tilt2)
    }
}

impl TryFrom<u8> for LidStatus {
    type Error = InvalidStatus;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(LidStatus::Closed),
            1 => Ok(LidStatus::Open),
            2 => Ok(LidStatus::Tilt0),
            3 => Ok(LidStatus::Tilt1),
            4 => Ok(LidStatus::Tilt2),
            other => Err(InvalidStatus(other)),
        }
    }
}

impl MoveDirection {
    /// The raw value used in persisted records.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Reverse the polarity.
    pub const fn opposite(self) -> Self {
        match self {
            MoveDirection::Forward => MoveDirection::Backward,
            MoveDirection::Backward => MoveDirection::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_are_stable() {
        assert_eq!(LidStatus::Closed.as_u8(), 0);
        assert_eq!(LidStatus::Open.as_u8(), 1);
        assert_eq!(LidStatus::Tilt0.as_u8(), 2);
        assert_eq!(LidStatus::Tilt1.as_u8(), 3);
        assert_eq!(LidStatus::Tilt2.as_u8(), 4);

        assert_eq!(MoveDirection::Forward.as_u8(), 0);
        assert_eq!(MoveDirection::Backward.as_u8(), 1);
    }

    #[test]
    fn test_try_from_round_trips_all_statuses() {
        for status in LidStatus::ALL {
            assert_eq!(LidStatus::try_from(status.as_u8()), Ok(status));
        }
    }

    #[test]
    fn test_try_from_rejects_unknown_bytes() {
        assert_eq!(LidStatus::try_from(5), Err(InvalidStatus(5)));
        assert_eq!(LidStatus::try_from(99), Err(InvalidStatus(99)));
        assert_eq!(LidStatus::try_from(255), Err(InvalidStatus(255)));
    }

    #[test]
    fn test_progression_order() {
        assert_eq!(LidStatus::Closed.next(), Some(LidStatus::Open));
        assert_eq!(LidStatus::Open.next(), Some(LidStatus::Tilt0));
        assert_eq!(LidStatus::Tilt0.next(), Some(LidStatus::Tilt1));
        assert_eq!(LidStatus::Tilt1.next(), Some(LidStatus::Tilt2));
        assert_eq!(LidStatus::Tilt2.next(), None);

        assert_eq!(LidStatus::Closed.previous(), None);
        assert_eq!(LidStatus::Tilt2.previous(), Some(LidStatus::Tilt1));
    }

    #[test]
    fn test_next_and_previous_are_inverses() {
        for status in LidStatus::ALL {
            if let Some(next) = status.next() {
                assert_eq!(next.previous(), Some(status));
            }
            if let Some(previous) = status.previous() {
                assert_eq!(previous.next(), Some(status));
            }
        }
    }

    #[test]
    fn test_hold_at_travel_ends() {
        assert_eq!(LidStatus::Tilt2.next_or_hold(), LidStatus::Tilt2);
        assert_eq!(LidStatus::Closed.previous_or_hold(), LidStatus::Closed);
        assert_eq!(LidStatus::Open.next_or_hold(), LidStatus::Tilt0);
        assert_eq!(LidStatus::Tilt1.previous_or_hold(), LidStatus::Tilt0);
    }

    #[test]
    fn test_is_tilted() {
        assert!(!LidStatus::Closed.is_tilted());
        assert!(!LidStatus::Open.is_tilted());
        assert!(LidStatus::Tilt0.is_tilted());
        assert!(LidStatus::Tilt1.is_tilted());
        assert!(LidStatus::Tilt2.is_tilted());
    }

    #[test]
    fn test_all_is_in_progression_order() {
        for pair in LidStatus::ALL.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }

    #[test]
    fn test_opposite_direction() {
        assert_eq!(MoveDirection::Forward.opposite(), MoveDirection::Backward);
        assert_eq!(MoveDirection::Backward.opposite(), MoveDirection::Forward);
    }
}
