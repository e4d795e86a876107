//! Closed-form vacuum queries.
//!
//! Angles are in radians, `y0` is the launch height above the reference
//! plane (+y up) and `g` is the magnitude of gravity.
//!
//! All three return 0 unless `g` is positive and finite: without gravity
//! there is no landing solution.

/// `v0² sin(2θ) / g + y0`, valid for `θ` in `[0, π]`.
pub fn range(v0: f64, angle: f64, g: f64, y0: f64) -> f64 {
    if !(g.is_finite() && g > 0.0) {
        return 0.0;
    }
    v0 * v0 * (2.0 * angle).sin() / g + y0
}

/// Apex height: `y0 + (v0 sin θ)² / (2g)`.
pub fn max_height(v0: f64, angle: f64, g: f64, y0: f64) -> f64 {
    if !(g.is_finite() && g > 0.0) {
        return 0.0;
    }
    let vy0 = v0 * angle.sin();
    y0 + vy0 * vy0 / (2.0 * g)
}

/// Positive root of `0 = y0 + v0 sin(θ) t - ½ g t²`.
///
/// Returns 0 when the discriminant `b² + 2 g y0` is negative: the
/// projectile never reaches the reference plane.
pub fn flight_time(v0: f64, angle: f64, g: f64, y0: f64) -> f64 {
    if !(g.is_finite() && g > 0.0) {
        return 0.0;
    }
    let b = v0 * angle.sin();
    let discriminant = b * b + 2.0 * g * y0;
    if discriminant < 0.0 {
        return 0.0;
    }
    ((b + discriminant.sqrt()) / g).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vertical_launch_has_no_range() {
        assert!(range(20.0, FRAC_PI_2, 9.81, 0.0).abs() < 1e-9);
        assert!((max_height(20.0, FRAC_PI_2, 9.81, 0.0) - 400.0 / 19.62).abs() < 1e-9);
    }

    #[test]
    fn test_launch_height_extends_flight() {
        let ground = flight_time(10.0, 0.5, 9.81, 0.0);
        let raised = flight_time(10.0, 0.5, 9.81, 5.0);
        assert!(raised > ground);
    }

    #[test]
    fn test_horizontal_drop_time() {
        // t = sqrt(2h/g)
        let t = flight_time(7.0, 0.0, 9.81, 20.0);
        assert!((t - (40.0f64 / 9.81).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_gravity_degrades() {
        for g in [0.0, -9.81, f64::NAN, f64::INFINITY] {
            assert_eq!(flight_time(20.0, 0.5, g, 0.0), 0.0);
            assert_eq!(range(20.0, 0.5, g, 0.0), 0.0);
            assert_eq!(max_height(20.0, 0.5, g, 0.0), 0.0);
        }
    }
}
