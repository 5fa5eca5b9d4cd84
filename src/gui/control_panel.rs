//! Control Panel Widget
//! Left side panel with layer toggles, anchoring and run summary.

use crate::charts::PlotLayers;
use crate::scene::{Anchor, Scene};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel of the run viewer.
pub struct ControlPanel {
    pub layers: PlotLayers,
    pub anchor: Anchor,
    pub status: String,
    /// Whether the run came from a directory that can be read again.
    pub can_reload: bool,
}

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    AnchorChanged,
    Reload,
}

fn anchor_label(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::TopLeft => "Top-left",
        Anchor::BottomLeft => "Bottom-left",
    }
}

impl ControlPanel {
    pub fn new(layers: PlotLayers, anchor: Anchor, can_reload: bool) -> Self {
        Self {
            layers,
            anchor,
            status: "Ready".to_string(),
            can_reload,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, scene: &Scene) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("RRT* Viz")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Layers =====
        ui.label(RichText::new("Layers").size(14.0).strong());
        ui.checkbox(&mut self.layers.tree, "Search tree");
        ui.checkbox(&mut self.layers.nodes, "Sampled nodes");
        ui.add_enabled(
            scene.speed_range.is_some(),
            egui::Checkbox::new(&mut self.layers.color_by_speed, "Color path by speed"),
        );
        ui.add_space(10.0);

        // ===== Anchoring =====
        ui.label(RichText::new("Rectangle anchor").size(14.0).strong());
        let before = self.anchor;
        ComboBox::from_id_salt("anchor")
            .selected_text(anchor_label(self.anchor))
            .show_ui(ui, |ui| {
                for anchor in [Anchor::TopLeft, Anchor::BottomLeft] {
                    ui.selectable_value(&mut self.anchor, anchor, anchor_label(anchor));
                }
            });
        if self.anchor != before {
            action = ControlPanelAction::AnchorChanged;
        }
        ui.add_space(10.0);

        // ===== Run summary =====
        ui.label(RichText::new("Run").size(14.0).strong());
        ui.label(format!("Sampled nodes: {}", scene.nodes.len()));
        ui.label(format!("Tree edges: {}", scene.edges.len()));
        ui.label(format!("Path points: {}", scene.path.len()));
        ui.label(format!("Obstacles: {}", scene.obstacles.len()));
        if let Some((min, max)) = scene.speed_range {
            ui.label(format!("Speed: {:.2} to {:.2}", min, max));
        }
        ui.add_space(10.0);

        if ui
            .add_enabled(self.can_reload, egui::Button::new("Reload run files"))
            .clicked()
        {
            action = ControlPanelAction::Reload;
        }

        ui.add_space(5.0);
        ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));

        action
    }
}
