//! Exponential half-life decay.
//!
//! An effect observed `dt` years after its cause retains
//! `value * exp(-ln2 * dt / half_life)` of its magnitude: half after one
//! half-life, a quarter after two, and so on. Decay only ever looks forward
//! in time, so a negative `dt` means the caller paired events in the wrong
//! order and is rejected.

use std::f64::consts::LN_2;

use crate::error::EngineError;

/// Check that a half-life is a positive, finite number of years.
///
/// # Errors
///
/// Returns [`EngineError::InvalidParameter`] otherwise.
pub fn validate_half_life(half_life_years: f64) -> Result<(), EngineError> {
    if half_life_years.is_finite() && half_life_years > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "decay half-life must be a positive number of years, got {half_life_years}"
        )))
    }
}

/// Decay `value` over `time_delta_years` with the given half-life.
///
/// A zero delta returns `value` unchanged.
///
/// # Errors
///
/// Returns [`EngineError::InvalidParameter`] if the half-life is not
/// positive or the time delta is negative (or either is not finite).
pub fn decay(value: f64, time_delta_years: f64, half_life_years: f64) -> Result<f64, EngineError> {
    validate_half_life(half_life_years)?;
    if !time_delta_years.is_finite() || time_delta_years < 0.0 {
        return Err(EngineError::invalid(format!(
            "decay time delta must be a non-negative number of years, got {time_delta_years}"
        )));
    }
    Ok(value * (-LN_2 * time_delta_years / half_life_years).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_identity() {
        let v = decay(42.5, 0.0, 20.0);
        assert!(v.is_ok_and(|v| (v - 42.5).abs() < 1e-12));
    }

    #[test]
    fn one_half_life_halves() {
        let v = decay(10.0, 20.0, 20.0);
        assert!(v.is_ok_and(|v| (v - 5.0).abs() < 1e-9));
    }

    #[test]
    fn two_half_lives_quarter() {
        let v = decay(-8.0, 30.0, 15.0);
        assert!(v.is_ok_and(|v| (v + 2.0).abs() < 1e-9));
    }

    #[test]
    fn non_positive_half_life_rejected() {
        assert!(matches!(
            decay(1.0, 1.0, 0.0),
            Err(EngineError::InvalidParameter { .. })
        ));
        assert!(matches!(
            decay(1.0, 1.0, -5.0),
            Err(EngineError::InvalidParameter { .. })
        ));
        assert!(decay(1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn negative_delta_rejected() {
        assert!(matches!(
            decay(1.0, -1.0, 20.0),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn decay_is_monotonic_in_time() {
        let near = decay(10.0, 5.0, 20.0).unwrap_or(f64::NAN);
        let far = decay(10.0, 50.0, 20.0).unwrap_or(f64::NAN);
        assert!(near > far);
        assert!(far > 0.0);
    }
}
