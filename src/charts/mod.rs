//! Charts module - Interactive scene plot and static image export

mod plotter;
mod renderer;

pub use plotter::{PlotLayers, ScenePlotter};
pub use renderer::{ImageFormat, RenderError, RenderOptions, SceneRenderer};
