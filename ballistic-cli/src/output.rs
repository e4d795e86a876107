//! CSV export of trajectories.

use ballistic_core::Simulation;
use glam::DVec2;
use std::io::{self, Write};

/// Maps world metres (+y up) to pixels (+y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    height: f64,
    scale: f64,
}

impl ScreenTransform {
    pub fn new(height: f64, scale: f64) -> Result<Self, String> {
        if !height.is_finite() {
            return Err(format!("screen height must be finite, got {}", height));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(format!("scale must be positive, got {}", scale));
        }
        Ok(Self { height, scale })
    }

    pub fn apply(&self, point: DVec2) -> DVec2 {
        DVec2::new(point.x * self.scale, self.height - point.y * self.scale)
    }
}

/// One row per trajectory point: live flights first, then archived traces.
pub fn write_csv<W: Write>(
    out: &mut W,
    sim: &Simulation,
    transform: Option<&ScreenTransform>,
) -> io::Result<()> {
    writeln!(out, "source,index,point,x,y")?;
    let live = sim
        .projectiles()
        .iter()
        .map(|p| ("projectile", p.trajectory()));
    let archived = sim.traces().iter().map(|t| ("trace", t));

    let mut counts = [0usize; 2];
    for (source, trajectory) in live.chain(archived) {
        let slot = usize::from(source == "trace");
        let index = counts[slot];
        counts[slot] += 1;
        for (point_index, point) in trajectory.points().iter().enumerate() {
            let p = transform.map_or(*point, |t| t.apply(*point));
            writeln!(out, "{},{},{},{},{}", source, index, point_index, p.x, p.y)?;
        }
    }
    out.flush()
}
