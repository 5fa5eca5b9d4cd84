//! Planner Environment Module
//! Rectangular workspace with axis-aligned obstacles.

use crate::geometry::{Point, Rect, Segment};
use rand::Rng;

/// Workspace `[0, width] × [0, height]` and its obstacles.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    width: f64,
    height: f64,
    obstacles: Vec<Rect>,
}

impl Environment {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, obstacle: Rect) {
        self.obstacles.push(obstacle);
    }

    /// Add `count` obstacles with random top-left corners inside the
    /// workspace and sides drawn from `[0, size_bound)`.
    pub fn add_random_obstacles<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        size_bound: f64,
        rng: &mut R,
    ) {
        for _ in 0..count {
            let obstacle = Rect::new(
                rng.gen::<f64>() * self.width,
                rng.gen::<f64>() * self.height,
                rng.gen::<f64>() * size_bound,
                rng.gen::<f64>() * size_bound,
            );
            self.obstacles.push(obstacle);
        }
    }

    pub fn in_bounds(&self, p: &Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Whether `p` lies outside every obstacle (boundaries count as inside).
    pub fn obstacle_free(&self, p: &Point) -> bool {
        !self.obstacles.iter().any(|ob| ob.contains(p))
    }

    /// Whether the straight move from `a` to `b` stays in free space.
    pub fn segment_free(&self, a: &Point, b: &Point) -> bool {
        if !(self.in_bounds(a) && self.in_bounds(b)) {
            return false;
        }
        if !(self.obstacle_free(a) && self.obstacle_free(b)) {
            return false;
        }
        let segment = Segment::new(*a, *b);
        !self.obstacles.iter().any(|ob| ob.crossed_by(&segment))
    }
}
