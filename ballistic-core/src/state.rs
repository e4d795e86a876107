use glam::DVec2;

/// Position (m) and velocity (m/s) of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl KinematicState {
    pub fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    /// State at the launch point, with velocity from speed and angle (radians above +x).
    pub fn at_launch(origin: DVec2, speed: f64, angle: f64) -> Self {
        Self {
            pos: origin,
            vel: DVec2::from_angle(angle) * speed,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    pub fn kinetic_energy(&self, mass: f64) -> f64 {
        0.5 * mass * self.vel.length_squared()
    }

    /// Potential energy relative to `y = 0`.
    pub fn potential_energy(&self, mass: f64, gravity: f64) -> f64 {
        mass * gravity * self.pos.y
    }

    pub fn mechanical_energy(&self, mass: f64, gravity: f64) -> f64 {
        self.kinetic_energy(mass) + self.potential_energy(mass, gravity)
    }
}
