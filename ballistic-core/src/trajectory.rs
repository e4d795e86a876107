use glam::DVec2;

/// Time-ordered positions of one flight. Append-only until reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<DVec2>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(point: DVec2) -> Self {
        Self {
            points: vec![point],
        }
    }

    /// Drop every sample and restart at `point`.
    pub fn reset_to(&mut self, point: DVec2) {
        self.points.clear();
        self.points.push(point);
    }

    pub fn push(&mut self, point: DVec2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest distance between any sample and `target`.
    pub fn closest_approach(&self, target: DVec2) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.distance(target))
            .min_by(f64::total_cmp)
    }

    pub fn max_height(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).max_by(f64::total_cmp)
    }
}
