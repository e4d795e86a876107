//! Environmental parameters: gravity, air density and wind.
//!
//! The core works in a +y-up frame. A wind direction of 0° blows toward +x,
//! 90° blows toward +y.

use crate::error::ConfigError;
use glam::DVec2;

pub const STANDARD_GRAVITY: f64 = 9.81;
/// Sea level, 15 °C.
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Air velocity, stored as components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wind {
    velocity: DVec2,
}

impl Wind {
    pub const fn calm() -> Self {
        Self {
            velocity: DVec2::ZERO,
        }
    }

    pub fn from_components(vx: f64, vy: f64) -> Result<Self, ConfigError> {
        ConfigError::require_finite("wind x", vx)?;
        ConfigError::require_finite("wind y", vy)?;
        Ok(Self {
            velocity: DVec2::new(vx, vy),
        })
    }

    /// Wind blowing toward `direction_deg` at `speed` m/s.
    pub fn from_speed_direction(speed: f64, direction_deg: f64) -> Result<Self, ConfigError> {
        ConfigError::require_non_negative("wind speed", speed)?;
        ConfigError::require_finite("wind direction", direction_deg)?;
        let theta = direction_deg.to_radians();
        Ok(Self {
            velocity: DVec2::new(theta.cos(), theta.sin()) * speed,
        })
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn is_calm(&self) -> bool {
        self.velocity == DVec2::ZERO
    }
}

/// Gravity, air density and wind for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentParameters {
    gravity: f64,
    air_density: f64,
    wind: Wind,
}

impl EnvironmentParameters {
    /// Environment with no wind.
    pub fn new(gravity: f64, air_density: f64) -> Result<Self, ConfigError> {
        ConfigError::require_finite("gravity", gravity)?;
        ConfigError::require_non_negative("air density", air_density)?;
        Ok(Self {
            gravity,
            air_density,
            wind: Wind::calm(),
        })
    }

    /// Vacuum with the given gravity.
    pub fn vacuum(gravity: f64) -> Result<Self, ConfigError> {
        Self::new(gravity, 0.0)
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = wind;
        self
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    pub fn wind(&self) -> Wind {
        self.wind
    }

    pub fn set_gravity(&mut self, gravity: f64) -> Result<(), ConfigError> {
        self.gravity = ConfigError::require_finite("gravity", gravity)?;
        Ok(())
    }

    pub fn set_air_density(&mut self, air_density: f64) -> Result<(), ConfigError> {
        self.air_density = ConfigError::require_non_negative("air density", air_density)?;
        Ok(())
    }

    pub fn set_wind(&mut self, wind: Wind) {
        self.wind = wind;
    }
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            air_density: STANDARD_AIR_DENSITY,
            wind: Wind::calm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_direction_convention() {
        let east = Wind::from_speed_direction(2.0, 0.0).unwrap();
        assert!((east.velocity().x - 2.0).abs() < 1e-12);
        assert!(east.velocity().y.abs() < 1e-12);

        let up = Wind::from_speed_direction(3.0, 90.0).unwrap();
        assert!(up.velocity().x.abs() < 1e-12);
        assert!((up.velocity().y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_wind_speed_rejected() {
        assert!(matches!(
            Wind::from_speed_direction(-1.0, 0.0),
            Err(ConfigError::Negative { .. })
        ));
    }

    #[test]
    fn test_negative_air_density_rejected() {
        assert!(EnvironmentParameters::new(9.81, -0.1).is_err());
        let mut env = EnvironmentParameters::default();
        assert!(env.set_air_density(-1.0).is_err());
        assert_eq!(env.air_density(), STANDARD_AIR_DENSITY);
    }

    #[test]
    fn test_non_finite_gravity_rejected() {
        assert!(EnvironmentParameters::new(f64::NAN, 1.0).is_err());
        assert!(EnvironmentParameters::new(f64::INFINITY, 1.0).is_err());
    }
}
