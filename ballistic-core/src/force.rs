use crate::body::BodyParameters;
use crate::environment::EnvironmentParameters;
use glam::DVec2;
use serde::Deserialize;

/// How air resistance depends on the velocity relative to the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragModel {
    /// Gravity only.
    None,
    /// `F = -0.5 * rho * Cd * A * |v_rel| * v_rel`
    #[default]
    Quadratic,
    /// `F = -k * v_rel`, with `k = 0.5 * rho * Cd * A` unless the body supplies one.
    Linear,
}

impl DragModel {
    pub fn label(&self) -> &'static str {
        match self {
            DragModel::None => "none",
            DragModel::Quadratic => "quadratic",
            DragModel::Linear => "linear",
        }
    }
}

/// Caps applied before and after the drag computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityLimits {
    /// Relative speed (m/s) is clamped to this before computing drag.
    pub max_relative_speed: f64,
    /// Length of the drag acceleration vector (m/s²) is clamped to this.
    pub max_drag_acceleration: f64,
}

impl Default for StabilityLimits {
    fn default() -> Self {
        Self {
            max_relative_speed: 10_000.0,
            max_drag_acceleration: 1_000.0,
        }
    }
}

/// Net acceleration of a body under gravity and drag.
///
/// Holds no state besides its parameters. Every evaluation is a pure
/// function of the velocity it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    pub environment: EnvironmentParameters,
    pub body: BodyParameters,
    pub drag: DragModel,
    pub limits: Option<StabilityLimits>,
}

impl ForceModel {
    pub fn new(environment: EnvironmentParameters, body: BodyParameters, drag: DragModel) -> Self {
        Self {
            environment,
            body,
            drag,
            limits: Some(StabilityLimits::default()),
        }
    }

    pub fn with_limits(mut self, limits: Option<StabilityLimits>) -> Self {
        self.limits = limits;
        self
    }

    /// Effective linear coefficient `k` (N·s/m).
    fn linear_coefficient(&self) -> f64 {
        self.body
            .linear_coefficient()
            .unwrap_or_else(|| self.half_rho_cd_a())
    }

    fn half_rho_cd_a(&self) -> f64 {
        0.5 * self.environment.air_density() * self.body.drag_area()
    }

    /// Whether drag contributes anything at all for these parameters.
    pub fn has_drag(&self) -> bool {
        match self.drag {
            DragModel::None => false,
            DragModel::Quadratic => self.half_rho_cd_a() > 0.0,
            DragModel::Linear => self.linear_coefficient() > 0.0,
        }
    }

    pub fn gravity_acceleration(&self) -> DVec2 {
        DVec2::new(0.0, -self.environment.gravity())
    }

    /// Drag contribution to the acceleration, in m/s².
    pub fn drag_acceleration(&self, velocity: DVec2) -> DVec2 {
        let mut v_rel = velocity - self.environment.wind().velocity();
        if let Some(limits) = &self.limits {
            v_rel = v_rel.clamp_length_max(limits.max_relative_speed);
        }

        let force = match self.drag {
            DragModel::None => return DVec2::ZERO,
            DragModel::Quadratic => {
                let speed = v_rel.length();
                if speed == 0.0 {
                    return DVec2::ZERO;
                }
                -self.half_rho_cd_a() * speed * v_rel
            }
            DragModel::Linear => -self.linear_coefficient() * v_rel,
        };

        let accel = force / self.body.mass();
        match &self.limits {
            Some(limits) => accel.clamp_length_max(limits.max_drag_acceleration),
            None => accel,
        }
    }

    /// Net acceleration `(gravity + drag) / mass` at the given velocity.
    pub fn acceleration(&self, velocity: DVec2) -> DVec2 {
        self.gravity_acceleration() + self.drag_acceleration(velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Wind;

    fn baseball_model(drag: DragModel) -> ForceModel {
        ForceModel::new(
            EnvironmentParameters::default(),
            BodyParameters::default(),
            drag,
        )
    }

    #[test]
    fn test_quadratic_drag_opposes_relative_velocity() {
        let model = baseball_model(DragModel::Quadratic);
        let v = DVec2::new(30.0, 10.0);
        let drag = model.drag_acceleration(v);

        // 0.5 * 1.225 * 0.47 * 0.0042 / 0.145 * |v| * v
        let c = 0.5 * 1.225 * 0.47 * 0.0042 / 0.145;
        let expected = -c * v.length() * v;
        assert!((drag - expected).length() < 1e-12);
        assert!(drag.dot(v) < 0.0);
    }

    #[test]
    fn test_linear_drag_uses_effective_coefficient() {
        let model = baseball_model(DragModel::Linear);
        let v = DVec2::new(-4.0, 8.0);
        let k = 0.5 * 1.225 * 0.47 * 0.0042;
        let expected = -k * v / 0.145;
        assert!((model.drag_acceleration(v) - expected).length() < 1e-12);
    }

    #[test]
    fn test_linear_drag_prefers_supplied_coefficient() {
        let body = BodyParameters::default().with_linear_coefficient(0.2).unwrap();
        let model = ForceModel::new(EnvironmentParameters::default(), body, DragModel::Linear);
        let v = DVec2::new(10.0, 0.0);
        let drag = model.drag_acceleration(v);
        assert!((drag.x - (-0.2 * 10.0 / 0.145)).abs() < 1e-12);
        assert_eq!(drag.y, 0.0);
    }

    #[test]
    fn test_zero_relative_speed_gives_zero_drag() {
        let env = EnvironmentParameters::default()
            .with_wind(Wind::from_components(5.0, -2.0).unwrap());
        let model = ForceModel::new(env, BodyParameters::default(), DragModel::Quadratic);
        let drag = model.drag_acceleration(DVec2::new(5.0, -2.0));
        assert_eq!(drag, DVec2::ZERO);
        assert_eq!(model.acceleration(DVec2::new(5.0, -2.0)), DVec2::new(0.0, -9.81));
    }

    #[test]
    fn test_tailwind_reduces_drag() {
        let still = baseball_model(DragModel::Quadratic);
        let tail = ForceModel {
            environment: EnvironmentParameters::default()
                .with_wind(Wind::from_components(10.0, 0.0).unwrap()),
            ..still
        };
        let v = DVec2::new(30.0, 0.0);
        assert!(tail.drag_acceleration(v).length() < still.drag_acceleration(v).length());
    }

    #[test]
    fn test_no_drag_model_is_gravity_only() {
        let model = baseball_model(DragModel::None);
        assert!(!model.has_drag());
        assert_eq!(model.acceleration(DVec2::new(100.0, 50.0)), DVec2::new(0.0, -9.81));
    }

    #[test]
    fn test_has_drag_in_vacuum() {
        let model = ForceModel::new(
            EnvironmentParameters::vacuum(9.81).unwrap(),
            BodyParameters::default(),
            DragModel::Quadratic,
        );
        assert!(!model.has_drag());
    }

    #[test]
    fn test_drag_clamped_at_extreme_speed() {
        let model = baseball_model(DragModel::Quadratic);
        let drag = model.drag_acceleration(DVec2::new(50_000.0, 0.0));
        assert!(drag.is_finite());
        assert!(drag.length() <= 1_000.0 + 1e-9);
        assert!(drag.x < 0.0);
    }

    #[test]
    fn test_unclamped_drag_grows_without_limit() {
        let model = baseball_model(DragModel::Quadratic).with_limits(None);
        let drag = model.drag_acceleration(DVec2::new(50_000.0, 0.0));
        assert!(drag.length() > 1_000.0);
    }
}
