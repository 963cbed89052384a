//! Numeric conversion helpers used by scoring.
//!
//! Scores are integral while the simulation runs in `f32`. These helpers keep
//! the float-to-integer boundary explicit and saturating instead of scattering
//! raw casts around the mission engine.

/// Floor a finite `f32` and clamp it into the `i64` domain.
///
/// Non-finite input yields `0`, which is the neutral score contribution.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i64 bounds before casting."
)]
#[must_use]
pub fn floor_to_i64(value: f32) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floored = f64::from(value).floor();
    #[expect(
        clippy::cast_precision_loss,
        reason = "Bounds only need to be approximately representable."
    )]
    let clamped = floored.clamp(i64::MIN as f64, i64::MAX as f64);
    clamped as i64
}

/// Clamp Δt to a usable, finite, non-negative value.
///
/// Returns `None` when the input had to be discarded, so callers can log.
#[must_use]
pub fn sanitise_delta(dt: f32) -> Option<f32> {
    if dt.is_finite() && dt >= 0.0 {
        Some(dt)
    } else {
        None
    }
}
