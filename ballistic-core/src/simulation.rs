//! Several projectiles sharing one environment.

use crate::environment::EnvironmentParameters;
use crate::error::{ConfigError, SimulationError};
use crate::preset::Preset;
use crate::projectile::{Phase, Projectile};
use crate::settings::SimulationSettings;
use crate::trajectory::Trajectory;
use glam::DVec2;
use tracing::debug;

/// Snapshot of one projectile for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub time: f64,
    pub position: DVec2,
    pub speed: f64,
    pub phase: Phase,
    pub landing_range: Option<f64>,
    pub target_distance: Option<f64>,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub drag: &'static str,
    pub scheme: &'static str,
}

/// Instability raised by one projectile during [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub index: usize,
    pub error: SimulationError,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    projectiles: Vec<Projectile>,
    environment: EnvironmentParameters,
    settings: SimulationSettings,
    target: Option<DVec2>,
    traces: Vec<Trajectory>,
    frames: u64,
}

impl Simulation {
    pub fn new(
        environment: EnvironmentParameters,
        settings: SimulationSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            projectiles: Vec::new(),
            environment,
            settings,
            target: None,
            traces: Vec::new(),
            frames: 0,
        })
    }

    /// Returns the index of the new projectile.
    pub fn add_projectile(&mut self, projectile: Projectile) -> usize {
        self.projectiles.push(projectile);
        self.projectiles.len() - 1
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectile(&self, index: usize) -> Result<&Projectile, SimulationError> {
        self.projectiles
            .get(index)
            .ok_or(SimulationError::UnknownProjectile(index))
    }

    pub fn projectile_mut(&mut self, index: usize) -> Result<&mut Projectile, SimulationError> {
        self.projectiles
            .get_mut(index)
            .ok_or(SimulationError::UnknownProjectile(index))
    }

    pub fn environment(&self) -> &EnvironmentParameters {
        &self.environment
    }

    pub fn set_environment(&mut self, environment: EnvironmentParameters) {
        self.environment = environment;
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SimulationSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Archived trajectories from earlier flights.
    pub fn traces(&self) -> &[Trajectory] {
        &self.traces
    }

    pub fn launch_all(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.launch();
        }
    }

    pub fn any_active(&self) -> bool {
        self.projectiles.iter().any(Projectile::is_active)
    }

    /// Advance every flying projectile by one frame.
    ///
    /// A projectile that goes unstable is reported and deactivated; the
    /// others keep going.
    pub fn step(&mut self) -> Vec<StepFailure> {
        self.frames += 1;
        let environment = self.environment;
        let settings = self.settings;
        self.projectiles
            .iter_mut()
            .enumerate()
            .filter_map(|(index, p)| {
                p.update(&environment, &settings)
                    .err()
                    .map(|error| StepFailure { index, error })
            })
            .collect()
    }

    /// Step until nothing is flying or `max_frames` have run.
    /// Paused projectiles do not keep the loop alive.
    pub fn run_until_settled(&mut self, max_frames: u64) -> Vec<StepFailure> {
        let mut failures = Vec::new();
        for _ in 0..max_frames {
            if !self.projectiles.iter().any(|p| p.phase() == Phase::Flying) {
                break;
            }
            failures.extend(self.step());
        }
        failures
    }

    /// Reset every projectile, archiving trajectories with more than two points.
    pub fn reset_all(&mut self) {
        for projectile in &mut self.projectiles {
            if projectile.trajectory().len() > 2 {
                self.traces.push(projectile.trajectory().clone());
            }
            projectile.reset();
        }
        self.frames = 0;
        debug!(archived = self.traces.len(), "simulation reset");
    }

    /// Drop archived traces and trim live trajectories to their current point.
    pub fn clear_traces(&mut self) {
        self.traces.clear();
        for projectile in &mut self.projectiles {
            projectile.clear_trajectory();
        }
    }

    pub fn set_target(&mut self, target: Option<DVec2>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<DVec2> {
        self.target
    }

    pub fn target_distance(&self, index: usize) -> Result<Option<f64>, SimulationError> {
        let projectile = self.projectile(index)?;
        Ok(self
            .target
            .map(|target| projectile.state().pos.distance(target)))
    }

    /// Apply a preset to the environment and to every unlaunched projectile.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), SimulationError> {
        self.environment = preset.environment();
        for projectile in self
            .projectiles
            .iter_mut()
            .filter(|p| p.phase() == Phase::Unlaunched)
        {
            let angle = projectile.angle_deg();
            projectile.set_launch(preset.launch_speed(), angle)?;
            projectile.set_body(preset.body())?;
        }
        debug!(preset = preset.name(), "preset applied");
        Ok(())
    }

    pub fn telemetry(&self, index: usize) -> Result<Telemetry, SimulationError> {
        let projectile = self.projectile(index)?;
        let state = projectile.state();
        let mass = projectile.body().mass();
        Ok(Telemetry {
            time: projectile.time(),
            position: state.pos,
            speed: state.speed(),
            phase: projectile.phase(),
            landing_range: projectile.landing_range(),
            target_distance: self.target_distance(index)?,
            kinetic_energy: state.kinetic_energy(mass),
            potential_energy: state.potential_energy(mass, self.environment.gravity()),
            drag: self.settings.drag.label(),
            scheme: self.settings.scheme.label(),
        })
    }
}
