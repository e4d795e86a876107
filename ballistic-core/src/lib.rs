pub mod analytic;
pub mod body;
pub mod config;
pub mod environment;
pub mod error;
pub mod force;
pub mod integrator;
pub mod preset;
pub mod projectile;
pub mod settings;
pub mod simulation;
pub mod state;
pub mod trajectory;

pub use body::BodyParameters;
pub use config::ScenarioConfig;
pub use environment::{EnvironmentParameters, Wind};
pub use error::{ConfigError, SimulationError};
pub use force::{DragModel, ForceModel, StabilityLimits};
pub use integrator::{advance, evaluate_at, evaluate_many, step, Scheme};
pub use preset::Preset;
pub use projectile::{InactiveReason, Phase, Projectile};
pub use settings::{Bounds, SimulationSettings};
pub use simulation::{Simulation, StepFailure, Telemetry};
pub use state::KinematicState;
pub use trajectory::Trajectory;
