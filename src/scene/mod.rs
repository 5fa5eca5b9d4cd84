//! Scene module - drawable geometry derived from run records

mod layout;

pub use layout::{Anchor, Bounds, DrawRect, PathVertex, Scene, SceneBuilder, MAX_TICKS, TICK_STEP};
