//! TOML scenario files.
//!
//! ```toml
//! preset = "outdoor"
//!
//! [environment]
//! gravity = 9.81
//! wind = { speed = 3.0, direction = 180.0 }
//!
//! [settings]
//! dt = 0.005
//! scheme = "euler"
//! drag = "linear"
//!
//! [[projectile]]
//! speed = 30.0
//! angle = 40.0
//! ```
//!
//! Every field is optional. Explicit values override the preset, which
//! overrides the built-in defaults.

use crate::body::BodyParameters;
use crate::environment::{EnvironmentParameters, Wind};
use crate::error::ConfigError;
use crate::force::{DragModel, StabilityLimits};
use crate::integrator::Scheme;
use crate::preset::Preset;
use crate::projectile::Projectile;
use crate::settings::{Bounds, SimulationSettings};
use crate::simulation::Simulation;
use glam::DVec2;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub preset: Option<String>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    pub target: Option<[f64; 2]>,
    #[serde(default, rename = "projectile")]
    pub projectiles: Vec<ProjectileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub gravity: Option<f64>,
    pub air_density: Option<f64>,
    pub wind: Option<WindConfig>,
}

/// Wind as `{ x, y }` components or `{ speed, direction }` in degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum WindConfig {
    Components { x: f64, y: f64 },
    SpeedDirection { speed: f64, direction: f64 },
}

impl WindConfig {
    pub fn to_wind(self) -> Result<Wind, ConfigError> {
        match self {
            WindConfig::Components { x, y } => Wind::from_components(x, y),
            WindConfig::SpeedDirection { speed, direction } => {
                Wind::from_speed_direction(speed, direction)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub mass: Option<f64>,
    pub drag_coefficient: Option<f64>,
    /// Cross-section in m². Ignored when `radius` is given.
    pub area: Option<f64>,
    pub radius: Option<f64>,
    pub linear_coefficient: Option<f64>,
}

impl BodyConfig {
    /// Fill unset fields from `base`.
    pub fn resolve(&self, base: &BodyParameters) -> Result<BodyParameters, ConfigError> {
        let mass = self.mass.unwrap_or(base.mass());
        let cd = self.drag_coefficient.unwrap_or(base.drag_coefficient());
        let mut body = match (self.radius, self.area) {
            (Some(radius), _) => BodyParameters::sphere(mass, cd, radius)?,
            (None, area) => BodyParameters::new(mass, cd, area.unwrap_or(base.area()))?,
        };
        if let Some(k) = self.linear_coefficient.or(base.linear_coefficient()) {
            body = body.with_linear_coefficient(k)?;
        }
        Ok(body)
    }

    /// `other` wins field by field, except that `area` and `radius` are one
    /// cross-section choice: naming either in `other` replaces both.
    fn overlay(&self, other: &BodyConfig) -> BodyConfig {
        let (area, radius) = if other.area.is_some() || other.radius.is_some() {
            (other.area, other.radius)
        } else {
            (self.area, self.radius)
        };
        BodyConfig {
            mass: other.mass.or(self.mass),
            drag_coefficient: other.drag_coefficient.or(self.drag_coefficient),
            area,
            radius,
            linear_coefficient: other.linear_coefficient.or(self.linear_coefficient),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundsConfig {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    pub dt: Option<f64>,
    pub scheme: Option<Scheme>,
    pub drag: Option<DragModel>,
    /// `false` turns off the drag clamps.
    pub stability: Option<bool>,
    pub max_relative_speed: Option<f64>,
    pub max_drag_acceleration: Option<f64>,
    pub ground_level: Option<f64>,
    pub bounds: Option<BoundsConfig>,
}

impl SettingsConfig {
    pub fn resolve(&self) -> Result<SimulationSettings, ConfigError> {
        let defaults = SimulationSettings::default();
        let limits = if self.stability.unwrap_or(true) {
            let base = StabilityLimits::default();
            Some(StabilityLimits {
                max_relative_speed: self.max_relative_speed.unwrap_or(base.max_relative_speed),
                max_drag_acceleration: self
                    .max_drag_acceleration
                    .unwrap_or(base.max_drag_acceleration),
            })
        } else {
            None
        };
        let bounds = self
            .bounds
            .map(|b| Bounds::new(DVec2::from(b.min), DVec2::from(b.max)))
            .transpose()?;
        let settings = SimulationSettings {
            dt: self.dt.unwrap_or(defaults.dt),
            scheme: self.scheme.unwrap_or(defaults.scheme),
            drag: self.drag.unwrap_or(defaults.drag),
            limits,
            ground_level: self.ground_level.unwrap_or(defaults.ground_level),
            bounds,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectileConfig {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub speed: Option<f64>,
    /// Degrees above +x.
    pub angle: Option<f64>,
    #[serde(default)]
    pub body: BodyConfig,
}

pub const DEFAULT_LAUNCH_SPEED: f64 = 40.0;
pub const DEFAULT_LAUNCH_ANGLE: f64 = 45.0;

impl ScenarioConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Scenario(e.to_string()))
    }

    pub fn preset(&self) -> Result<Option<Preset>, ConfigError> {
        self.preset.as_deref().map(str::parse::<Preset>).transpose()
    }

    pub fn resolve_environment(&self) -> Result<EnvironmentParameters, ConfigError> {
        let base = self
            .preset()?
            .map(|p| p.environment())
            .unwrap_or_default();
        let mut env = EnvironmentParameters::new(
            self.environment.gravity.unwrap_or(base.gravity()),
            self.environment.air_density.unwrap_or(base.air_density()),
        )?;
        let wind = match self.environment.wind {
            Some(wind) => wind.to_wind()?,
            None => base.wind(),
        };
        env.set_wind(wind);
        Ok(env)
    }

    /// Validate everything and build a ready-to-launch simulation.
    ///
    /// A scenario without `[[projectile]]` entries gets one default shot.
    pub fn build_simulation(&self) -> Result<Simulation, ConfigError> {
        let preset = self.preset()?;
        let environment = self.resolve_environment()?;
        let settings = self.settings.resolve()?;
        let base_body = preset.map(|p| p.body()).unwrap_or_default();
        let default_speed = preset.map_or(DEFAULT_LAUNCH_SPEED, |p| p.launch_speed());

        let mut sim = Simulation::new(environment, settings)?;
        let single = [ProjectileConfig::default()];
        let entries = if self.projectiles.is_empty() {
            &single[..]
        } else {
            &self.projectiles[..]
        };
        for entry in entries {
            let body = self.body.overlay(&entry.body).resolve(&base_body)?;
            let projectile = Projectile::new(
                DVec2::new(entry.x, entry.y),
                entry.speed.unwrap_or(default_speed),
                entry.angle.unwrap_or(DEFAULT_LAUNCH_ANGLE),
                body,
            )?;
            sim.add_projectile(projectile);
        }
        if let Some([x, y]) = self.target {
            sim.set_target(Some(DVec2::new(x, y)));
        }
        Ok(sim)
    }
}
