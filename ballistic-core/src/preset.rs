use crate::body::BodyParameters;
use crate::environment::{EnvironmentParameters, Wind, STANDARD_AIR_DENSITY, STANDARD_GRAVITY};
use crate::error::ConfigError;
use std::str::FromStr;

/// Named scene configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Still air, slightly thinner, slower throw.
    Indoor,
    /// Light breeze toward +x, sea-level air.
    Outdoor,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Indoor => "indoor",
            Preset::Outdoor => "outdoor",
        }
    }

    pub fn environment(&self) -> EnvironmentParameters {
        let (density, wind) = match self {
            Preset::Indoor => (1.18, Wind::calm()),
            Preset::Outdoor => (
                STANDARD_AIR_DENSITY,
                Wind::from_speed_direction(2.0, 0.0).unwrap_or_default(),
            ),
        };
        EnvironmentParameters::new(STANDARD_GRAVITY, density)
            .unwrap_or_default()
            .with_wind(wind)
    }

    /// Launch speed in m/s.
    pub fn launch_speed(&self) -> f64 {
        match self {
            Preset::Indoor => 25.0,
            Preset::Outdoor => 40.0,
        }
    }

    /// Both presets throw the default ball.
    pub fn body(&self) -> BodyParameters {
        BodyParameters::default()
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indoor" | "interior" => Ok(Preset::Indoor),
            "outdoor" | "exterior" => Ok(Preset::Outdoor),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_values() {
        let indoor = Preset::Indoor.environment();
        assert_eq!(indoor.air_density(), 1.18);
        assert!(indoor.wind().is_calm());
        assert_eq!(Preset::Indoor.launch_speed(), 25.0);

        let outdoor = Preset::Outdoor.environment();
        assert_eq!(outdoor.air_density(), 1.225);
        assert!((outdoor.wind().velocity().x - 2.0).abs() < 1e-12);
        assert_eq!(Preset::Outdoor.launch_speed(), 40.0);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!("Outdoor".parse::<Preset>().unwrap(), Preset::Outdoor);
        assert!(matches!(
            "moon".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
