use crate::error::ConfigError;
use std::f64::consts::PI;

/// Physical properties of a projectile. Fixed while it is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParameters {
    mass: f64,
    drag_coefficient: f64,
    area: f64,
    linear_coefficient: Option<f64>,
}

impl BodyParameters {
    /// Body with cross-sectional `area` (m²) and drag coefficient `cd`.
    pub fn new(mass: f64, cd: f64, area: f64) -> Result<Self, ConfigError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        ConfigError::require_non_negative("drag coefficient", cd)?;
        ConfigError::require_non_negative("area", area)?;
        Ok(Self {
            mass,
            drag_coefficient: cd,
            area,
            linear_coefficient: None,
        })
    }

    /// Sphere of the given radius; area is π r².
    pub fn sphere(mass: f64, cd: f64, radius: f64) -> Result<Self, ConfigError> {
        ConfigError::require_non_negative("radius", radius)?;
        Self::new(mass, cd, PI * radius * radius)
    }

    /// Point mass, no drag under any model.
    pub fn point_mass(mass: f64) -> Result<Self, ConfigError> {
        Self::new(mass, 0.0, 0.0)
    }

    /// Override the linear drag coefficient `k` (N·s/m).
    pub fn with_linear_coefficient(mut self, k: f64) -> Result<Self, ConfigError> {
        self.linear_coefficient = Some(ConfigError::require_non_negative("linear coefficient", k)?);
        Ok(self)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn linear_coefficient(&self) -> Option<f64> {
        self.linear_coefficient
    }

    /// `Cd * A`, the shape factor shared by both drag models.
    pub fn drag_area(&self) -> f64 {
        self.drag_coefficient * self.area
    }
}

impl Default for BodyParameters {
    /// Regulation baseball: 145 g, 7.3 cm diameter.
    fn default() -> Self {
        Self {
            mass: 0.145,
            drag_coefficient: 0.47,
            area: 0.0042,
            linear_coefficient: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_area() {
        let body = BodyParameters::sphere(1.0, 0.47, 0.1).unwrap();
        assert!((body.area() - PI * 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        assert_eq!(
            BodyParameters::new(0.0, 0.47, 0.01),
            Err(ConfigError::NonPositiveMass(0.0))
        );
        assert!(BodyParameters::new(-2.0, 0.47, 0.01).is_err());
        assert!(BodyParameters::new(f64::NAN, 0.47, 0.01).is_err());
    }

    #[test]
    fn test_rejects_negative_drag() {
        assert!(BodyParameters::new(1.0, -0.1, 0.01).is_err());
        assert!(BodyParameters::new(1.0, 0.1, -0.01).is_err());
        assert!(BodyParameters::default()
            .with_linear_coefficient(-1.0)
            .is_err());
    }
}
