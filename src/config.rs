//! Scenario Configuration Module
//! JSON description of a planning problem: workspace, obstacles, start, goal,
//! dynamics and sampling parameters.

use crate::geometry::{Point, Rect};
use crate::planner::{Environment, Limits, PlannerSettings};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid scenario JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

/// Obstacles scattered at random on top of the fixed ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomObstacles {
    pub count: usize,
    pub size_bound: f64,
}

/// What the planner's tree nodes are.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dynamics {
    /// Kinematic points; the step is a distance.
    #[default]
    Point,
    /// Points with bounded velocity and acceleration; the step is a time step.
    Dynamic {
        #[serde(default)]
        limits: Limits,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub width: f64,
    pub height: f64,
    /// Top-left anchored obstacle rectangles.
    pub obstacles: Vec<Rect>,
    pub random_obstacles: Option<RandomObstacles>,
    pub start: Point,
    /// Top-left anchored goal region.
    pub goal: Rect,
    pub dynamics: Dynamics,
    pub planner: PlannerSettings,
    /// Fixed seed for reproducible runs; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    /// Three hanging walls on a 50×50 field, start top-left, goal top-right.
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            obstacles: vec![
                Rect::new(10.0, 50.0, 2.0, 45.0),
                Rect::new(20.0, 40.0, 2.0, 45.0),
                Rect::new(30.0, 50.0, 2.0, 45.0),
            ],
            random_obstacles: None,
            start: Point::new(1.0, 48.0),
            goal: Rect::new(43.0, 49.0, 7.0, 2.0),
            dynamics: Dynamics::Point,
            planner: PlannerSettings::default(),
            seed: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "environment size must be positive, got {} x {}",
                self.width, self.height
            )));
        }
        if self.planner.samples == 0 {
            return Err(ConfigError::Invalid("samples must be at least 1".into()));
        }
        if !(self.planner.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "radius must be positive, got {}",
                self.planner.radius
            )));
        }
        if !(self.planner.step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "step must be positive, got {}",
                self.planner.step
            )));
        }
        if let Dynamics::Dynamic { limits } = &self.dynamics {
            if !(limits.max_speed.is_finite() && limits.max_speed > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "max_speed must be positive and finite, got {}",
                    limits.max_speed
                )));
            }
            if !(limits.max_accel.is_finite() && limits.max_accel >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "max_accel must not be negative and must be finite, got {}",
                    limits.max_accel
                )));
            }
        }
        if let Some(random) = &self.random_obstacles {
            if random.size_bound < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "random obstacle size bound must not be negative, got {}",
                    random.size_bound
                )));
            }
        }
        Ok(())
    }

    /// Build the planner environment, scattering random obstacles if asked.
    pub fn environment<R: Rng + ?Sized>(&self, rng: &mut R) -> Environment {
        let mut env = Environment::new(self.width, self.height);
        for obstacle in &self.obstacles {
            env.add_obstacle(*obstacle);
        }
        if let Some(random) = self.random_obstacles {
            env.add_random_obstacles(random.count, random.size_bound, rng);
        }
        env
    }
}
