//! Level conversion helpers.
//!
//! Node gain is set as linear amplitude in `[0, 1]` but stored and applied
//! as decibels internally. Conversions here carry a silence floor so that a
//! zero (or negative) amplitude maps to a finite dB value instead of
//! negative infinity.

/// Gain values at or below this dB level are rendered as exact silence.
pub const SILENCE_FLOOR_DB: f32 = -100.0;

/// Convert decibels to linear gain.
///
/// Values at or below [`SILENCE_FLOOR_DB`] return exactly 0.0.
///
/// # Example
/// ```rust
/// use suena_core::math::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    if db <= SILENCE_FLOOR_DB {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// Convert linear gain to decibels, clamped at the silence floor.
///
/// # Example
/// ```rust
/// use suena_core::math::{linear_to_db, SILENCE_FLOOR_DB};
///
/// assert!((linear_to_db(1.0)).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), SILENCE_FLOOR_DB);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        SILENCE_FLOOR_DB
    } else {
        (20.0 * linear.log10()).max(SILENCE_FLOOR_DB)
    }
}

/// Convert a linear amplitude in `[0, 1]` to the stored dB gain.
///
/// Input is clamped to the unit range first; `amp_to_db(0.0)` is the
/// silence floor, never `-inf` or NaN.
#[inline]
pub fn amp_to_db(amp: f32) -> f32 {
    linear_to_db(amp.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_roundtrip() {
        for &g in &[1.0f32, 0.5, 0.25, 0.1, 0.01] {
            let db = linear_to_db(g);
            let back = db_to_linear(db);
            assert!((back - g).abs() < 1e-4, "roundtrip failed for {g}: {back}");
        }
    }

    #[test]
    fn zero_amp_is_floor_not_infinity() {
        let db = amp_to_db(0.0);
        assert!(db.is_finite());
        assert_eq!(db, SILENCE_FLOOR_DB);
        assert_eq!(db_to_linear(db), 0.0);
    }

    #[test]
    fn amp_clamps_unit_range() {
        assert_eq!(amp_to_db(2.0), 0.0);
        assert_eq!(amp_to_db(-1.0), SILENCE_FLOOR_DB);
    }

    #[test]
    fn known_values() {
        assert!((amp_to_db(1.0)).abs() < 1e-6);
        assert!((amp_to_db(0.5) - (-6.0206)).abs() < 0.01);
    }
}
