//! Evenly spaced sampling along one axis.

use crate::error::SampleError;

/// Largest number of values a single sampled axis may hold.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Values `start, start + step, ...` strictly below `stop`.
///
/// Each value is computed as `start + i * step` so long sweeps do not
/// accumulate rounding error. Returns an empty vector when `stop <= start`,
/// and [`SampleError::TooManySamples`] when the span needs more than
/// [`MAX_SAMPLES`] values.
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, SampleError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(SampleError::InvalidStep(step));
    }
    let count = sample_count(start, stop, step)?;
    Ok((0..count).map(|i| offset(start, i, step)).collect())
}

/// Values from `min` up to and including `max` when `max - min` is a whole
/// number of steps.
///
/// Equivalent to `arange(min, max + 1.0, step)` as used for plotting grids:
/// with `step >= 1` the last sample lands on `max` whenever the span
/// divides evenly.
pub fn inclusive_range(
    axis: &'static str,
    min: f64,
    max: f64,
    step: f64,
) -> Result<Vec<f64>, SampleError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(SampleError::EmptyAxis(axis));
    }
    if min > max {
        return Err(SampleError::InvertedBounds { axis, min, max });
    }
    let values = arange(min, max + 1.0, step)?;
    if values.is_empty() {
        return Err(SampleError::EmptyAxis(axis));
    }
    Ok(values)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_count(start: f64, stop: f64, step: f64) -> Result<usize, SampleError> {
    let span = stop - start;
    if span.is_nan() || span <= 0.0 {
        return Ok(0);
    }
    let requested = (span / step).ceil();
    if requested > MAX_SAMPLES as f64 {
        return Err(SampleError::TooManySamples {
            requested,
            max: MAX_SAMPLES,
        });
    }
    Ok(requested as usize)
}

#[allow(clippy::cast_precision_loss)]
fn offset(start: f64, i: usize, step: f64) -> f64 {
    start + i as f64 * step
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arange_excludes_stop() {
        let v = arange(0.0, 5.0, 1.0).unwrap();
        assert_eq!(v, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn arange_partial_last_step() {
        let v = arange(0.0, 1.0, 0.4).unwrap();
        assert_eq!(v.len(), 3);
        assert_relative_eq!(v[2], 0.8, epsilon = 1e-12);
    }

    #[test]
    fn arange_empty_when_stop_not_above_start() {
        assert!(arange(1.0, 1.0, 0.5).unwrap().is_empty());
        assert!(arange(2.0, 1.0, 0.5).unwrap().is_empty());
    }

    #[test]
    fn arange_rejects_bad_step() {
        assert!(matches!(arange(0.0, 1.0, 0.0), Err(SampleError::InvalidStep(_))));
        assert!(matches!(arange(0.0, 1.0, -1.0), Err(SampleError::InvalidStep(_))));
        assert!(matches!(
            arange(0.0, 1.0, f64::NAN),
            Err(SampleError::InvalidStep(_))
        ));
    }

    #[test]
    fn arange_rejects_oversized_span() {
        assert!(matches!(
            arange(0.0, 1e300, 1.0),
            Err(SampleError::TooManySamples { .. })
        ));
        assert!(matches!(
            arange(0.0, 1.0, 1e-300),
            Err(SampleError::TooManySamples { .. })
        ));
        assert!(matches!(
            arange(-f64::MAX, f64::MAX, 1.0),
            Err(SampleError::TooManySamples { .. })
        ));
    }

    #[test]
    fn arange_accepts_span_at_limit() {
        let v = arange(0.0, 1.0, 1.0 / 1024.0).unwrap();
        assert_eq!(v.len(), 1024);
    }

    #[test]
    fn inclusive_range_hits_max() {
        let v = inclusive_range("x", -10.0, 10.0, 5.0).unwrap();
        assert_eq!(v, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn inclusive_range_single_point() {
        let v = inclusive_range("z", 3.0, 3.0, 2.0).unwrap();
        assert_eq!(v, vec![3.0]);
    }

    #[test]
    fn inclusive_range_rejects_inverted() {
        let err = inclusive_range("z", 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, SampleError::InvertedBounds { axis: "z", .. }));
    }
}
