//! A single projectile and its launch lifecycle.

use crate::body::BodyParameters;
use crate::environment::EnvironmentParameters;
use crate::error::{ConfigError, SimulationError};
use crate::force::ForceModel;
use crate::integrator::{self, EVALUATION_STEP, MAX_EVALUATION_STEPS};
use crate::settings::SimulationSettings;
use crate::state::KinematicState;
use crate::trajectory::Trajectory;
use glam::DVec2;
use tracing::{debug, trace, warn};

/// Why a projectile stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    Landed,
    OutOfBounds,
    Unstable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Parameters may still change.
    Unlaunched,
    Flying,
    Paused,
    Inactive(InactiveReason),
}

#[derive(Debug, Clone)]
pub struct Projectile {
    origin: DVec2,
    speed: f64,
    angle_deg: f64,
    body: BodyParameters,
    state: KinematicState,
    time: f64,
    trajectory: Trajectory,
    phase: Phase,
}

impl Projectile {
    pub fn new(
        origin: DVec2,
        speed: f64,
        angle_deg: f64,
        body: BodyParameters,
    ) -> Result<Self, ConfigError> {
        check_launch(origin, speed, angle_deg)?;
        Ok(Self {
            origin,
            speed,
            angle_deg,
            body,
            state: KinematicState::at_launch(origin, speed, angle_deg.to_radians()),
            time: 0.0,
            trajectory: Trajectory::starting_at(origin),
            phase: Phase::Unlaunched,
        })
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn body(&self) -> &BodyParameters {
        &self.body
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Seconds since launch.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Flying | Phase::Paused)
    }

    fn ensure_unlaunched(&self) -> Result<(), SimulationError> {
        match self.phase {
            Phase::Unlaunched => Ok(()),
            _ => Err(SimulationError::ProjectileLocked),
        }
    }

    fn rederive_launch_state(&mut self) {
        self.state = KinematicState::at_launch(self.origin, self.speed, self.angle_deg.to_radians());
        self.trajectory.reset_to(self.origin);
    }

    pub fn set_position(&mut self, origin: DVec2) -> Result<(), SimulationError> {
        self.ensure_unlaunched()?;
        check_launch(origin, self.speed, self.angle_deg)?;
        self.origin = origin;
        self.rederive_launch_state();
        Ok(())
    }

    pub fn set_launch(&mut self, speed: f64, angle_deg: f64) -> Result<(), SimulationError> {
        self.ensure_unlaunched()?;
        check_launch(self.origin, speed, angle_deg)?;
        self.speed = speed;
        self.angle_deg = angle_deg;
        self.rederive_launch_state();
        Ok(())
    }

    pub fn set_body(&mut self, body: BodyParameters) -> Result<(), SimulationError> {
        self.ensure_unlaunched()?;
        self.body = body;
        Ok(())
    }

    /// Start (or restart) the flight from the launch point.
    pub fn launch(&mut self) {
        self.time = 0.0;
        self.rederive_launch_state();
        self.phase = Phase::Flying;
        debug!(
            speed = self.speed,
            angle = self.angle_deg,
            x = self.origin.x,
            y = self.origin.y,
            "projectile launched"
        );
    }

    /// Back to unlaunched at the origin.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.rederive_launch_state();
        self.phase = Phase::Unlaunched;
    }

    /// Keep only the current position in the trajectory. The flight goes on.
    pub fn clear_trajectory(&mut self) {
        self.trajectory.reset_to(self.state.pos);
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Flying => Phase::Paused,
            Phase::Paused => Phase::Flying,
            other => other,
        };
    }

    pub fn force_model(
        &self,
        environment: &EnvironmentParameters,
        settings: &SimulationSettings,
    ) -> ForceModel {
        ForceModel::new(*environment, self.body, settings.drag).with_limits(settings.limits)
    }

    /// Advance one frame of `settings.dt`. A no-op unless flying.
    ///
    /// Instability is reported once; the projectile is then inactive.
    pub fn update(
        &mut self,
        environment: &EnvironmentParameters,
        settings: &SimulationSettings,
    ) -> Result<Phase, SimulationError> {
        if self.phase != Phase::Flying {
            return Ok(self.phase);
        }

        let forces = self.force_model(environment, settings);
        let next = integrator::step(&self.state, settings.dt, &forces, settings.scheme);
        self.time += settings.dt;

        let Some(next) = next else {
            self.phase = Phase::Inactive(InactiveReason::Unstable);
            warn!(time = self.time, "projectile went unstable");
            return Err(SimulationError::NumericalInstability { time: self.time });
        };

        let prev = self.state;
        self.state = next;
        self.settle(prev, settings);
        self.trajectory.push(self.state.pos);
        trace!(t = self.time, x = self.state.pos.x, y = self.state.pos.y, "frame");
        Ok(self.phase)
    }

    /// Ground and bounds checks after moving from `prev` to the current state.
    fn settle(&mut self, prev: KinematicState, settings: &SimulationSettings) {
        let ground = settings.ground_level;
        if self.state.pos.y < ground {
            // interpolate the crossing point along the last segment
            let drop = prev.pos.y - self.state.pos.y;
            let f = if drop > 0.0 {
                ((prev.pos.y - ground) / drop).clamp(0.0, 1.0)
            } else {
                1.0
            };
            self.state.pos.x = prev.pos.x + f * (self.state.pos.x - prev.pos.x);
            self.state.pos.y = ground;
            self.phase = Phase::Inactive(InactiveReason::Landed);
            debug!(time = self.time, x = self.state.pos.x, "projectile landed");
        } else if let Some(bounds) = &settings.bounds {
            if !bounds.contains(self.state.pos) {
                self.phase = Phase::Inactive(InactiveReason::OutOfBounds);
                debug!(time = self.time, "projectile left bounds");
            }
        }
    }

    /// Replace the flight with its state at `time` after launch, computed
    /// from scratch. The trajectory is resampled at the frame step.
    ///
    /// The projectile must have been launched. An unstable one stays
    /// unstable until [`reset`](Self::reset).
    pub fn jump_to(
        &mut self,
        time: f64,
        environment: &EnvironmentParameters,
        settings: &SimulationSettings,
    ) -> Result<Phase, SimulationError> {
        match self.phase {
            Phase::Unlaunched => return Err(SimulationError::NotLaunched),
            Phase::Inactive(InactiveReason::Unstable) => {
                return Err(SimulationError::ProjectileUnstable)
            }
            _ => {}
        }
        if !(time.is_finite() && time >= 0.0) {
            return Err(ConfigError::InvalidElapsedTime(time).into());
        }
        let frames = (time / settings.dt).floor();
        if frames > MAX_EVALUATION_STEPS as f64 {
            return Err(SimulationError::StepLimitExceeded {
                required: frames as u64,
                limit: MAX_EVALUATION_STEPS,
            });
        }

        let mut times: Vec<f64> = (1..=frames as u64).map(|k| k as f64 * settings.dt).collect();
        if time > times.last().copied().unwrap_or(0.0) {
            times.push(time);
        }

        let forces = self.force_model(environment, settings);
        let result = integrator::evaluate_many(
            self.origin,
            self.angle_deg.to_radians(),
            self.speed,
            &times,
            &forces,
            EVALUATION_STEP,
        );
        let samples = match result {
            Ok(samples) => samples,
            Err(err) => {
                if let SimulationError::NumericalInstability { time } = err {
                    self.time = time;
                    self.phase = Phase::Inactive(InactiveReason::Unstable);
                    warn!(time, "projectile went unstable during evaluation");
                }
                return Err(err);
            }
        };

        let was_paused = self.phase == Phase::Paused;
        self.phase = Phase::Flying;
        self.time = 0.0;
        self.rederive_launch_state();
        for (t, sample) in times.iter().zip(samples) {
            let prev = self.state;
            self.state = sample;
            self.time = *t;
            self.settle(prev, settings);
            self.trajectory.push(self.state.pos);
            if self.phase != Phase::Flying {
                break;
            }
        }
        if was_paused && self.phase == Phase::Flying {
            self.phase = Phase::Paused;
        }
        Ok(self.phase)
    }

    /// Horizontal distance covered, once landed.
    pub fn landing_range(&self) -> Option<f64> {
        match self.phase {
            Phase::Inactive(InactiveReason::Landed) => Some(self.state.pos.x - self.origin.x),
            _ => None,
        }
    }
}

fn check_launch(origin: DVec2, speed: f64, angle_deg: f64) -> Result<(), ConfigError> {
    ConfigError::require_finite("origin x", origin.x)?;
    ConfigError::require_finite("origin y", origin.y)?;
    ConfigError::require_non_negative("launch speed", speed)?;
    ConfigError::require_finite("launch angle", angle_deg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Projectile {
        Projectile::new(DVec2::ZERO, 20.0, 45.0, BodyParameters::default()).unwrap()
    }

    #[test]
    fn test_update_does_nothing_before_launch() {
        let mut p = ball();
        let phase = p
            .update(&EnvironmentParameters::default(), &SimulationSettings::default())
            .unwrap();
        assert_eq!(phase, Phase::Unlaunched);
        assert_eq!(p.trajectory().len(), 1);
    }

    #[test]
    fn test_parameters_lock_after_launch() {
        let mut p = ball();
        assert!(p.set_launch(30.0, 30.0).is_ok());
        p.launch();
        assert_eq!(p.set_launch(10.0, 10.0), Err(SimulationError::ProjectileLocked));
        assert_eq!(p.set_position(DVec2::ONE), Err(SimulationError::ProjectileLocked));
        assert_eq!(
            p.set_body(BodyParameters::point_mass(1.0).unwrap()),
            Err(SimulationError::ProjectileLocked)
        );
        p.reset();
        assert!(p.set_position(DVec2::ONE).is_ok());
    }

    #[test]
    fn test_pause_stops_updates() {
        let mut p = ball();
        let env = EnvironmentParameters::default();
        let settings = SimulationSettings::default();
        p.launch();
        p.update(&env, &settings).unwrap();
        p.toggle_pause();
        let before = *p.state();
        p.update(&env, &settings).unwrap();
        assert_eq!(*p.state(), before);
        p.toggle_pause();
        p.update(&env, &settings).unwrap();
        assert_ne!(*p.state(), before);
    }

    #[test]
    fn test_lands_on_ground() {
        let mut p = ball();
        let env = EnvironmentParameters::default();
        let settings = SimulationSettings::default();
        p.launch();
        for _ in 0..10_000 {
            if p.update(&env, &settings).unwrap() != Phase::Flying {
                break;
            }
        }
        assert_eq!(p.phase(), Phase::Inactive(InactiveReason::Landed));
        assert_eq!(p.state().pos.y, 0.0);
        let range = p.landing_range().unwrap();
        // drag makes the shot fall short of the 40.77 m vacuum range
        assert!(range > 30.0 && range < 40.77, "range {}", range);
    }

    #[test]
    fn test_unstable_state_is_terminal() {
        let mut p = Projectile::new(DVec2::new(0.0, 10.0), 1e300, 45.0, BodyParameters::default())
            .unwrap();
        let env = EnvironmentParameters::default();
        let settings = SimulationSettings {
            limits: None,
            ..SimulationSettings::default()
        };
        p.launch();
        let err = p.update(&env, &settings).unwrap_err();
        assert!(matches!(err, SimulationError::NumericalInstability { .. }));
        assert_eq!(p.phase(), Phase::Inactive(InactiveReason::Unstable));
        // no further stepping
        let len = p.trajectory().len();
        assert!(p.update(&env, &settings).is_ok());
        assert_eq!(p.trajectory().len(), len);
    }

    #[test]
    fn test_launch_resets_trajectory() {
        let mut p = ball();
        let env = EnvironmentParameters::default();
        let settings = SimulationSettings::default();
        p.launch();
        for _ in 0..20 {
            p.update(&env, &settings).unwrap();
        }
        assert_eq!(p.trajectory().len(), 21);
        p.launch();
        assert_eq!(p.trajectory().points(), &[DVec2::ZERO]);
        assert_eq!(p.time(), 0.0);
    }

    #[test]
    fn test_jump_requires_launch() {
        let mut p = ball();
        let result = p.jump_to(0.5, &EnvironmentParameters::default(), &SimulationSettings::default());
        assert_eq!(result, Err(SimulationError::NotLaunched));
        assert_eq!(p.phase(), Phase::Unlaunched);
        assert_eq!(p.trajectory().len(), 1);
    }

    #[test]
    fn test_jump_does_not_revive_unstable_projectile() {
        let mut p = Projectile::new(DVec2::new(0.0, 10.0), 1e300, 45.0, BodyParameters::default())
            .unwrap();
        let env = EnvironmentParameters::default();
        let unclamped = SimulationSettings {
            limits: None,
            ..SimulationSettings::default()
        };
        p.launch();
        assert!(p.update(&env, &unclamped).is_err());

        let vacuum = EnvironmentParameters::vacuum(9.81).unwrap();
        let result = p.jump_to(0.5, &vacuum, &SimulationSettings::default());
        assert_eq!(result, Err(SimulationError::ProjectileUnstable));
        assert_eq!(p.phase(), Phase::Inactive(InactiveReason::Unstable));

        // a reset is the way back
        p.reset();
        p.set_launch(20.0, 45.0).unwrap();
        p.launch();
        let phase = p.jump_to(0.5, &vacuum, &SimulationSettings::default()).unwrap();
        assert_eq!(phase, Phase::Flying);
    }
}
