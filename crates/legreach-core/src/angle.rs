//! Angle wrapping helpers.

use std::f64::consts::{PI, TAU};

/// Wrap an angle produced by a single sum or difference of two wrapped
/// angles into `(-π, π]`.
///
/// Applies at most one `2π` correction, which is enough for any input in
/// `(-3π, 3π]`. Use [`normalize_angle`] for arbitrary inputs.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - TAU
    } else if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Bring an arbitrary finite angle into `[-π, π]`.
///
/// Non-finite input is returned unchanged.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let mut angle = angle;
    while angle > PI || angle < -PI {
        if angle > PI {
            angle -= TAU;
        } else {
            angle += TAU;
        }
    }
    angle
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
