//! RRT* Viz Main Application
//! Plot window with control panel and interactive scene plot.

use crate::charts::{PlotLayers, ScenePlotter};
use crate::data::{RunData, RunLoader};
use crate::gui::{ControlPanel, ControlPanelAction};
use crate::scene::{Anchor, Scene, SceneBuilder};
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window.
pub struct RunViewerApp {
    run: RunData,
    /// Run directory the records were loaded from, if any.
    source: Option<PathBuf>,
    scene: Scene,
    control_panel: ControlPanel,
}

impl RunViewerApp {
    pub fn new(run: RunData, source: Option<PathBuf>, anchor: Anchor, layers: PlotLayers) -> Self {
        let scene = SceneBuilder::build(&run, anchor);
        let control_panel = ControlPanel::new(layers, anchor, source.is_some());
        Self {
            run,
            source,
            scene,
            control_panel,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn rebuild_scene(&mut self) {
        self.scene = SceneBuilder::build(&self.run, self.control_panel.anchor);
    }

    fn handle_reload(&mut self) {
        let Some(dir) = self.source.clone() else {
            return;
        };

        match RunLoader::load_run(&dir) {
            Ok(run) => {
                self.run = run;
                self.rebuild_scene();
                self.control_panel.status = format!("Reloaded {}", dir.display());
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.control_panel.status = format!("Reload failed: {}", e);
            }
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::AnchorChanged => self.rebuild_scene(),
            ControlPanelAction::Reload => self.handle_reload(),
            ControlPanelAction::None => {}
        }
    }
}

impl eframe::App for RunViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(220.0)
            .max_width(280.0)
            .show(ctx, |ui| {
                let action = self.control_panel.show(ui, &self.scene);
                self.handle_action(action);
            });

        // Central panel - Scene plot
        egui::CentralPanel::default().show(ctx, |ui| {
            ScenePlotter::show(ui, &self.scene, &self.control_panel.layers);
        });
    }
}
