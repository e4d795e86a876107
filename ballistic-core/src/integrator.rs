use crate::error::{ConfigError, SimulationError};
use crate::force::ForceModel;
use crate::state::KinematicState;
use glam::DVec2;
use serde::Deserialize;

/// Internal step used by [`evaluate_at`].
pub const EVALUATION_STEP: f64 = 0.01;

/// Hard cap on the number of fixed steps a single evaluation may take.
pub const MAX_EVALUATION_STEPS: u64 = 1_000_000;

/// Time-stepping scheme for incremental updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// `v += a*dt`, then `x += v*dt` with the updated velocity.
    #[serde(alias = "euler")]
    SemiImplicitEuler,
    /// Classic fourth-order Runge-Kutta.
    #[default]
    #[serde(alias = "runge_kutta")]
    Rk4,
}

impl Scheme {
    pub fn label(&self) -> &'static str {
        match self {
            Scheme::SemiImplicitEuler => "euler",
            Scheme::Rk4 => "rk4",
        }
    }
}

/// Time derivative of the state: `(dx/dt, dv/dt)`.
#[derive(Debug, Clone, Copy)]
struct Derivative {
    dpos: DVec2,
    dvel: DVec2,
}

impl Derivative {
    fn at(state: &KinematicState, forces: &ForceModel) -> Option<Self> {
        let d = Self {
            dpos: state.vel,
            dvel: forces.acceleration(state.vel),
        };
        (d.dpos.is_finite() && d.dvel.is_finite()).then_some(d)
    }
}

fn offset(state: &KinematicState, d: &Derivative, h: f64) -> KinematicState {
    KinematicState {
        pos: state.pos + d.dpos * h,
        vel: state.vel + d.dvel * h,
    }
}

/// Advance `state` by one step of `dt`.
///
/// Returns `None` as soon as any intermediate value is non-finite.
pub fn step(
    state: &KinematicState,
    dt: f64,
    forces: &ForceModel,
    scheme: Scheme,
) -> Option<KinematicState> {
    let next = match scheme {
        Scheme::SemiImplicitEuler => {
            let accel = forces.acceleration(state.vel);
            let vel = state.vel + accel * dt;
            KinematicState {
                pos: state.pos + vel * dt,
                vel,
            }
        }
        Scheme::Rk4 => {
            let k1 = Derivative::at(state, forces)?;
            let k2 = Derivative::at(&offset(state, &k1, 0.5 * dt), forces)?;
            let k3 = Derivative::at(&offset(state, &k2, 0.5 * dt), forces)?;
            let k4 = Derivative::at(&offset(state, &k3, dt), forces)?;
            KinematicState {
                pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
                vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
            }
        }
    };
    next.is_finite().then_some(next)
}

/// Split `duration` into full steps of `dt` plus a shorter remainder.
fn plan_steps(duration: f64, dt: f64) -> Result<(u64, f64), SimulationError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ConfigError::InvalidTimeStep(dt).into());
    }
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(ConfigError::InvalidElapsedTime(duration).into());
    }

    let required = (duration / dt).ceil();
    if required > MAX_EVALUATION_STEPS as f64 {
        return Err(SimulationError::StepLimitExceeded {
            required: required as u64,
            limit: MAX_EVALUATION_STEPS,
        });
    }

    let full = (duration / dt).floor();
    let remainder = duration - full * dt;
    Ok((full as u64, remainder.max(0.0)))
}

/// Advance `state` by `duration` using steps of `dt`, shortening the final
/// step so the result lands exactly on `duration`.
pub fn advance(
    state: &KinematicState,
    duration: f64,
    dt: f64,
    forces: &ForceModel,
    scheme: Scheme,
) -> Result<KinematicState, SimulationError> {
    let (full, remainder) = plan_steps(duration, dt)?;
    let mut current = *state;
    let mut t = 0.0;

    for _ in 0..full {
        t += dt;
        current = step(&current, dt, forces, scheme)
            .ok_or(SimulationError::NumericalInstability { time: t })?;
    }
    if remainder > 0.0 {
        current = step(&current, remainder, forces, scheme)
            .ok_or(SimulationError::NumericalInstability { time: duration })?;
    }
    Ok(current)
}

/// Closed-form vacuum trajectory at time `t`.
pub fn parabolic_state(origin: DVec2, angle: f64, speed: f64, t: f64, gravity: f64) -> KinematicState {
    let v0 = DVec2::from_angle(angle) * speed;
    let g = DVec2::new(0.0, -gravity);
    KinematicState {
        pos: origin + v0 * t + 0.5 * g * t * t,
        vel: v0 + g * t,
    }
}

/// Position and velocity `elapsed` seconds after launch, from scratch.
///
/// Without drag this is the parabola. With drag it integrates from launch
/// with explicit Euler at [`EVALUATION_STEP`].
pub fn evaluate_at(
    origin: DVec2,
    launch_angle: f64,
    initial_speed: f64,
    elapsed: f64,
    forces: &ForceModel,
) -> Result<KinematicState, SimulationError> {
    evaluate_at_with_step(origin, launch_angle, initial_speed, elapsed, forces, EVALUATION_STEP)
}

pub fn evaluate_at_with_step(
    origin: DVec2,
    launch_angle: f64,
    initial_speed: f64,
    elapsed: f64,
    forces: &ForceModel,
    internal_dt: f64,
) -> Result<KinematicState, SimulationError> {
    let states = evaluate_many(origin, launch_angle, initial_speed, &[elapsed], forces, internal_dt)?;
    // one sample in, one sample out
    Ok(states[0])
}

/// [`evaluate_at_with_step`] for several non-decreasing `times` in one pass.
///
/// Each returned state is identical to evaluating its time on its own.
pub fn evaluate_many(
    origin: DVec2,
    launch_angle: f64,
    initial_speed: f64,
    times: &[f64],
    forces: &ForceModel,
    internal_dt: f64,
) -> Result<Vec<KinematicState>, SimulationError> {
    if !forces.has_drag() {
        let gravity = forces.environment.gravity();
        return times
            .iter()
            .map(|&t| -> Result<KinematicState, SimulationError> {
                if !(t.is_finite() && t >= 0.0) {
                    return Err(ConfigError::InvalidElapsedTime(t).into());
                }
                let state = parabolic_state(origin, launch_angle, initial_speed, t, gravity);
                if state.is_finite() {
                    Ok(state)
                } else {
                    Err(SimulationError::NumericalInstability { time: t })
                }
            })
            .collect();
    }

    let explicit_step = |state: &mut KinematicState, h: f64, t: f64| {
        let accel = forces.acceleration(state.vel);
        state.pos += state.vel * h;
        state.vel += accel * h;
        if state.is_finite() {
            Ok(())
        } else {
            Err(SimulationError::NumericalInstability { time: t })
        }
    };

    let mut grid = KinematicState::at_launch(origin, initial_speed, launch_angle);
    let mut grid_steps = 0u64;
    let mut out = Vec::with_capacity(times.len());

    for &elapsed in times {
        let (full, remainder) = plan_steps(elapsed, internal_dt)?;
        if full < grid_steps {
            return Err(ConfigError::InvalidElapsedTime(elapsed).into());
        }
        while grid_steps < full {
            grid_steps += 1;
            explicit_step(&mut grid, internal_dt, grid_steps as f64 * internal_dt)?;
        }
        let mut sample = grid;
        if remainder > 0.0 {
            explicit_step(&mut sample, remainder, elapsed)?;
        }
        out.push(sample);
    }
    Ok(out)
}
