use crate::error::ConfigError;
use crate::force::{DragModel, StabilityLimits};
use crate::integrator::Scheme;
use glam::DVec2;

/// Axis-aligned region a projectile must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite()) || min.x >= max.x || min.y >= max.y {
            return Err(ConfigError::Scenario(format!(
                "bounds must be finite with min < max, got {min} .. {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Per-frame integration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub dt: f64,
    pub scheme: Scheme,
    pub drag: DragModel,
    pub limits: Option<StabilityLimits>,
    /// Height of the ground plane (m).
    pub ground_level: f64,
    pub bounds: Option<Bounds>,
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        ConfigError::require_finite("ground level", self.ground_level)?;
        if let Some(limits) = &self.limits {
            ConfigError::require_non_negative("max relative speed", limits.max_relative_speed)?;
            ConfigError::require_non_negative(
                "max drag acceleration",
                limits.max_drag_acceleration,
            )?;
        }
        Ok(())
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            dt: 0.01,
            scheme: Scheme::Rk4,
            drag: DragModel::Quadratic,
            limits: Some(StabilityLimits::default()),
            ground_level: 0.0,
            bounds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 5.0)).unwrap();
        assert!(b.contains(DVec2::new(10.0, 5.0)));
        assert!(b.contains(DVec2::new(0.0, 2.0)));
        assert!(!b.contains(DVec2::new(10.1, 2.0)));
        assert!(!b.contains(DVec2::new(3.0, -0.1)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(Bounds::new(DVec2::new(5.0, 0.0), DVec2::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_validate_time_step() {
        let mut s = SimulationSettings::default();
        assert!(s.validate().is_ok());
        s.dt = 0.0;
        assert_eq!(s.validate(), Err(ConfigError::InvalidTimeStep(0.0)));
        s.dt = f64::NAN;
        assert!(s.validate().is_err());
    }
}
