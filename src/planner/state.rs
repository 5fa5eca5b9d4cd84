//! Planner State Module
//! What the search tree stores per node, and how states are sampled and
//! steered toward each other.

use crate::geometry::Point;
use crate::planner::Environment;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A configuration the planner can sample, connect and measure.
pub trait State: Clone + Send + Sync {
    fn position(&self) -> Point;

    /// `(vx, vy)` for states that carry one.
    fn velocity(&self) -> Option<(f64, f64)> {
        None
    }

    /// Cost of connecting two states; straight-line distance by default.
    fn distance(&self, other: &Self) -> f64 {
        self.position().distance(&other.position())
    }

    /// Draw a random state inside the environment. `self` supplies any
    /// parameters the new state inherits.
    fn sample<R: Rng + ?Sized>(&self, env: &Environment, rng: &mut R) -> Self;

    /// A new state one `step` from `self` in the direction of `target`.
    fn steer(&self, target: &Self, step: f64) -> Self;
}

fn random_position<R: Rng + ?Sized>(env: &Environment, rng: &mut R) -> Point {
    Point::new(
        rng.gen::<f64>() * env.width(),
        rng.gen::<f64>() * env.height(),
    )
}

/// Kinematic point: `step` is a distance.
impl State for Point {
    fn position(&self) -> Point {
        *self
    }

    fn sample<R: Rng + ?Sized>(&self, env: &Environment, rng: &mut R) -> Self {
        random_position(env, rng)
    }

    fn steer(&self, target: &Self, step: f64) -> Self {
        self.move_towards(target, step)
    }
}

/// Velocity and acceleration bounds of a [`DynamicPoint`], per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_speed: f64,
    pub max_accel: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            max_accel: 1.0,
        }
    }
}

/// Point with velocity; `step` is a time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicPoint {
    pub position: Point,
    pub velocity: (f64, f64),
    pub limits: Limits,
}

impl DynamicPoint {
    pub fn at_rest(position: Point, limits: Limits) -> Self {
        Self {
            position,
            velocity: (0.0, 0.0),
            limits,
        }
    }

    /// One axis of a steering step: pick the velocity that would reach
    /// `goal` in `dt`, bounded by the speed limit and by what the
    /// acceleration limit allows from `v`.
    fn steer_axis(&self, p: f64, v: f64, goal: f64, dt: f64) -> (f64, f64) {
        let max_speed = self.limits.max_speed;
        let dv = self.limits.max_accel * dt;

        let wanted = ((goal - p) / dt).clamp(-max_speed, max_speed);
        let v_new = wanted.clamp(v - dv, v + dv).clamp(-max_speed, max_speed);
        (p + v_new * dt, v_new)
    }
}

impl State for DynamicPoint {
    fn position(&self) -> Point {
        self.position
    }

    fn velocity(&self) -> Option<(f64, f64)> {
        Some(self.velocity)
    }

    fn sample<R: Rng + ?Sized>(&self, env: &Environment, rng: &mut R) -> Self {
        let max = self.limits.max_speed;
        let mut axis = || (rng.gen::<f64>() * 2.0 - 1.0) * max;
        let velocity = (axis(), axis());
        Self {
            position: random_position(env, rng),
            velocity,
            limits: self.limits,
        }
    }

    fn steer(&self, target: &Self, dt: f64) -> Self {
        if dt <= 0.0 {
            return *self;
        }
        let (x, vx) = self.steer_axis(self.position.x, self.velocity.0, target.position.x, dt);
        let (y, vy) = self.steer_axis(self.position.y, self.velocity.1, target.position.y, dt);
        Self {
            position: Point::new(x, y),
            velocity: (vx, vy),
            limits: self.limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn point_steer_moves_at_most_one_step() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 0.0);

        let next = from.steer(&to, 0.5);
        assert_relative_eq!(next.x, 0.5);
        assert_relative_eq!(from.distance(&next), 0.5);
    }

    #[test]
    fn samples_stay_inside_the_environment() {
        let env = Environment::new(20.0, 10.0);
        let mut rng = StdRng::seed_from_u64(7);
        let template = DynamicPoint::at_rest(Point::new(0.0, 0.0), Limits::default());

        for _ in 0..200 {
            let p = Point::default().sample(&env, &mut rng);
            assert!(env.in_bounds(&p));

            let d = template.sample(&env, &mut rng);
            assert!(env.in_bounds(&d.position));
            assert!(d.velocity.0.abs() <= 5.0 && d.velocity.1.abs() <= 5.0);
        }
    }

    #[test]
    fn dynamic_steer_respects_acceleration_limit() {
        let from = DynamicPoint::at_rest(Point::new(0.0, 0.0), Limits::default());
        let target = DynamicPoint::at_rest(Point::new(10.0, -10.0), Limits::default());

        let next = from.steer(&target, 0.5);
        assert_relative_eq!(next.velocity.0, 0.5);
        assert_relative_eq!(next.velocity.1, -0.5);
        assert_relative_eq!(next.position.x, 0.25);
        assert_relative_eq!(next.position.y, -0.25);
    }

    #[test]
    fn dynamic_steer_respects_speed_limit() {
        let limits = Limits {
            max_speed: 2.0,
            max_accel: 100.0,
        };
        let from = DynamicPoint::at_rest(Point::new(0.0, 0.0), limits);
        let target = DynamicPoint::at_rest(Point::new(100.0, 0.0), limits);

        let next = from.steer(&target, 1.0);
        assert_relative_eq!(next.velocity.0, 2.0);
        assert_relative_eq!(next.position.x, 2.0);
        assert_relative_eq!(next.velocity.1, 0.0);
    }

    #[test]
    fn dynamic_steer_stops_on_a_reachable_target() {
        let limits = Limits {
            max_speed: 5.0,
            max_accel: 10.0,
        };
        let from = DynamicPoint::at_rest(Point::new(0.0, 0.0), limits);
        let target = DynamicPoint::at_rest(Point::new(1.0, 2.0), limits);

        let next = from.steer(&target, 1.0);
        assert_relative_eq!(next.position.x, 1.0);
        assert_relative_eq!(next.position.y, 2.0);
    }
}
