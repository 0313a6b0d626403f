//! Tilt sequencing
//!
//! Computes the band the motor must drive toward to move one stage
//! along the Closed → Open → Tilt0 → Tilt1 → Tilt2 progression. Tilt
//! stages are always visited in order; requesting "next" from the last
//! stage holds there rather than wrapping back to closed.

use super::range::LidPosition;
use super::status::{InvalidStatus, LidStatus, MoveDirection};

/// The band to drive toward to advance one stage.
///
/// From `Closed` the next target is `Open` (the lid must open before
/// any tilt stage is reachable); from `Tilt2` the target is `Tilt2`
/// itself, which callers see as an immediately satisfied move. The
/// returned direction is always `Forward`.
pub fn next_tilt_target(status: LidStatus) -> LidPosition {
    status.next_or_hold().position_range()
}

/// [`next_tilt_target`] from a raw status byte.
pub fn next_tilt_target_from_raw(raw: u8) -> Result<LidPosition, InvalidStatus> {
    LidStatus::try_from(raw).map(next_tilt_target)
}

/// The band to drive toward to retreat one stage.
///
/// Holds at `Closed`. The factory table stores the polarity used to
/// approach each band from below, so the direction is overridden to
/// `Backward` here: retreating to an intermediate stage approaches it
/// from above.
pub fn previous_tilt_target(status: LidStatus) -> LidPosition {
    let mut target = status.previous_or_hold().position_range();
    target.movement_direction = MoveDirection::Backward;
    target
}
