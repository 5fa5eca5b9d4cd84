//! Planner module - RRT* over a rectangular environment

mod environment;
mod export;
mod rrt_star;
mod state;
mod tree;

pub use environment::Environment;
pub use rrt_star::{PlanStats, PlannerError, PlannerSettings, RrtStar};
pub use state::{DynamicPoint, Limits, State};
pub use tree::{NodeId, SearchTree, TreeNode};
