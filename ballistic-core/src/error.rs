use thiserror::Error;

/// Rejected parameter values, reported before any stepping happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("mass must be positive and finite, got {0}")]
    NonPositiveMass(f64),
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("elapsed time must be non-negative and finite, got {0}")]
    InvalidElapsedTime(f64),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("scenario: {0}")]
    Scenario(String),
}

impl ConfigError {
    /// Check that `value` is finite and `>= 0`.
    pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::Negative { name, value })
        }
    }

    pub fn require_finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }
}

/// Errors raised while advancing or querying a projectile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The state became non-finite. Terminal for the projectile.
    #[error("numerical instability at t = {time:.4} s")]
    NumericalInstability { time: f64 },
    #[error("evaluation would need {required} steps, limit is {limit}")]
    StepLimitExceeded { required: u64, limit: u64 },
    #[error("projectile parameters are locked after launch")]
    ProjectileLocked,
    #[error("projectile has not been launched")]
    NotLaunched,
    /// Raised for any further request once a projectile went unstable.
    #[error("projectile went unstable, reset it before flying again")]
    ProjectileUnstable,
    #[error("no projectile at index {0}")]
    UnknownProjectile(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
