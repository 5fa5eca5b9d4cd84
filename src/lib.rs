//! RRT* Viz library
//!
//! Scenario configuration, the RRT* planner, CSV run files, the interactive
//! plot window and static image export shared by the `rrtstar-viz` binary.

pub mod charts;
pub mod config;
pub mod data;
pub mod geometry;
pub mod gui;
pub mod planner;
pub mod scene;
