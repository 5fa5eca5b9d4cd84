//! Run Records Module
//! Typed rows of the five files a planner run leaves behind.

use crate::geometry::{Point, Rect};

/// Speed normalisation: the square of the default per-axis velocity limit.
pub const SPEED_NORMALISATION: f64 = 25.0;

/// File names inside a run directory.
pub const NODES_FILE: &str = "nodesSampled_RRTstar.csv";
pub const PATH_FILE: &str = "optimalPath_RRTstar.csv";
pub const OBSTACLES_FILE: &str = "obstacles.csv";
pub const TREE_FILE: &str = "tree_RRTstar.csv";
pub const ENVIRONMENT_FILE: &str = "environment.csv";

/// One point of the optimal path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: Point,
    /// `(vx, vy)`, absent when the file only carries positions.
    pub velocity: Option<(f64, f64)>,
}

impl PathPoint {
    pub fn new(position: Point, velocity: Option<(f64, f64)>) -> Self {
        Self { position, velocity }
    }

    /// Plotted speed: `(vx² + vy²) / 25`.
    pub fn speed(&self) -> Option<f64> {
        self.velocity
            .map(|(vx, vy)| (vx * vx + vy * vy) / SPEED_NORMALISATION)
    }
}

/// A parent-child connection of the search tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEdge {
    pub from: Point,
    pub to: Point,
}

/// The three positional rows of `environment.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentRecord {
    /// Environment size along x and y.
    pub extent: (f64, f64),
    pub start: Point,
    /// Goal region, top-left anchored.
    pub goal: Rect,
}

/// Everything one planner run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunData {
    pub nodes: Vec<Point>,
    pub path: Vec<PathPoint>,
    pub obstacles: Vec<Rect>,
    pub tree: Vec<TreeEdge>,
    pub environment: EnvironmentRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_is_normalised_squared_velocity() {
        let p = PathPoint::new(Point::new(1.0, 1.0), Some((3.0, 4.0)));
        assert_relative_eq!(p.speed().unwrap_or(f64::NAN), 1.0);

        let negative = PathPoint::new(Point::new(0.0, 0.0), Some((-5.0, 0.0)));
        let speed = negative.speed().unwrap_or(f64::NAN);
        assert_relative_eq!(speed, 1.0);
        assert!(speed >= 0.0);
    }

    #[test]
    fn positions_only_have_no_speed() {
        let p = PathPoint::new(Point::new(1.0, 1.0), None);
        assert!(p.speed().is_none());
    }
}
