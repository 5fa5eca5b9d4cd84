//! RRT* Planner Module
//! Grows a search tree from the start state by random sampling, choosing the
//! cheapest collision-free parent for every new node and rewiring neighbours
//! that become cheaper through it.
//!
//! Extend step:
//! 1. Sample a random state and find its nearest tree node
//! 2. Steer from the nearest node toward the sample
//! 3. Reject the new state if the connecting move collides
//! 4. Among nodes within the radius, pick the cheapest collision-free parent
//! 5. Rewire neighbours whose cost drops when reached through the new node

use crate::geometry::Rect;
use crate::planner::{Environment, NodeId, SearchTree, State};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PlannerError {
    #[error("start position ({x}, {y}) is outside the environment or inside an obstacle")]
    StartBlocked { x: f64, y: f64 },
    #[error("no sampled node reached the goal region after {nodes} nodes")]
    NoPathFound { nodes: usize },
}

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Number of nodes to add to the tree (the root excluded).
    pub samples: usize,
    /// Neighbourhood radius for parent choice and rewiring.
    pub radius: f64,
    /// Steering step: a distance for kinematic points, a time step for
    /// dynamic ones.
    pub step: f64,
    /// Upper bound on extend attempts, successful or not.
    pub max_iterations: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            samples: 5000,
            radius: 4.0,
            step: 0.5,
            max_iterations: 200_000,
        }
    }
}

/// Summary of a planning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanStats {
    pub nodes_added: usize,
    pub iterations: usize,
    pub elapsed: Duration,
}

pub struct RrtStar<'a, S: State> {
    env: &'a Environment,
    goal: Rect,
    settings: PlannerSettings,
    tree: SearchTree<S>,
}

impl<'a, S: State> RrtStar<'a, S> {
    pub fn new(
        env: &'a Environment,
        goal: Rect,
        start: S,
        settings: PlannerSettings,
    ) -> Result<Self, PlannerError> {
        let p = start.position();
        if !(env.in_bounds(&p) && env.obstacle_free(&p)) {
            return Err(PlannerError::StartBlocked { x: p.x, y: p.y });
        }

        Ok(Self {
            env,
            goal,
            settings,
            tree: SearchTree::with_capacity(start, settings.samples.saturating_add(1)),
        })
    }

    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    pub fn environment(&self) -> &Environment {
        self.env
    }

    pub fn goal(&self) -> Rect {
        self.goal
    }

    /// Extend until `samples` nodes were added or `max_iterations` attempts
    /// were spent.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PlanStats {
        let started = Instant::now();
        let mut nodes_added = 0;
        let mut iterations = 0;

        while nodes_added < self.settings.samples && iterations < self.settings.max_iterations {
            iterations += 1;
            if self.extend(rng) {
                nodes_added += 1;
                if nodes_added % 1000 == 0 {
                    tracing::debug!(nodes_added, iterations, "extending tree");
                }
            }
        }

        let stats = PlanStats {
            nodes_added,
            iterations,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            nodes = stats.nodes_added,
            iterations = stats.iterations,
            seconds = stats.elapsed.as_secs_f64(),
            "RRT* calculation complete"
        );
        stats
    }

    /// One extend step; returns whether a node was added.
    pub fn extend<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let root = self.tree.node(self.tree.root()).state.clone();
        let proposed = root.sample(self.env, rng);

        let nearest = self.nearest(&proposed);
        let nearest_state = &self.tree.node(nearest).state;
        let new_state = nearest_state.steer(&proposed, self.settings.step);

        if !self.collision_free(nearest_state, &new_state) {
            return false;
        }

        // Choose parent
        let neighbours = self.near(&new_state, self.settings.radius);
        let mut best_parent = nearest;
        let mut best_cost = self.tree.node(nearest).cost + nearest_state.distance(&new_state);
        for &id in &neighbours {
            if id == nearest {
                continue;
            }
            let node = self.tree.node(id);
            let cost = node.cost + node.state.distance(&new_state);
            if cost < best_cost && self.collision_free(&node.state, &new_state) {
                best_parent = id;
                best_cost = cost;
            }
        }

        let new_id = self.tree.push(new_state, best_parent, best_cost);

        // Rewire
        for &id in &neighbours {
            if id == best_parent {
                continue;
            }
            let node = self.tree.node(id);
            let new_state = &self.tree.node(new_id).state;
            let cost = best_cost + new_state.distance(&node.state);
            if cost < node.cost && self.collision_free(new_state, &node.state) {
                self.tree.reparent(id, new_id, cost);
            }
        }

        true
    }

    /// Root-first states of the cheapest path ending inside the goal region.
    pub fn best_path(&self) -> Result<Vec<S>, PlannerError> {
        let best = self
            .tree
            .ids()
            .filter(|&id| self.goal.contains(&self.tree.node(id).state.position()))
            .min_by(|&a, &b| {
                self.tree
                    .node(a)
                    .cost
                    .total_cmp(&self.tree.node(b).cost)
                    .then(a.cmp(&b))
            })
            .ok_or(PlannerError::NoPathFound {
                nodes: self.tree.len(),
            })?;

        tracing::info!(
            cost = self.tree.node(best).cost,
            "final path retrieved"
        );
        Ok(self
            .tree
            .ancestor_path(best)
            .into_iter()
            .map(|id| self.tree.node(id).state.clone())
            .collect())
    }

    fn collision_free(&self, a: &S, b: &S) -> bool {
        self.env.segment_free(&a.position(), &b.position())
    }

    /// Closest node to `target`; ties go to the lowest id.
    fn nearest(&self, target: &S) -> NodeId {
        self.tree
            .nodes()
            .par_iter()
            .enumerate()
            .map(|(i, node)| (node.state.distance(target), i))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| NodeId(i))
            .unwrap_or(self.tree.root())
    }

    /// Every node within `radius` of `target`, in id order.
    fn near(&self, target: &S, radius: f64) -> Vec<NodeId> {
        self.tree
            .nodes()
            .par_iter()
            .enumerate()
            .filter(|(_, node)| node.state.distance(target) <= radius)
            .map(|(i, _)| NodeId(i))
            .collect()
    }
}
