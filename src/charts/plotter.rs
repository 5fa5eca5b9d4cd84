//! Scene Plotter Module
//! Draws a planner run scene into an interactive egui_plot view.

use crate::scene::{DrawRect, Scene};
use egui::ecolor::Hsva;
use egui::{Color32, Stroke};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points, Polygon};

pub const OBSTACLE_COLOR: Color32 = Color32::from_rgb(214, 39, 40); // Red
pub const GOAL_COLOR: Color32 = Color32::from_rgb(44, 160, 44); // Green
pub const PATH_COLOR: Color32 = Color32::from_rgb(31, 119, 180); // Blue
pub const EDGE_COLOR: Color32 = Color32::from_rgb(170, 170, 170); // Grey
const REGION_ALPHA: f32 = 0.3;

/// Which parts of the scene the plot shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayers {
    pub tree: bool,
    pub nodes: bool,
    /// Color path segments by speed when the path carries velocities.
    pub color_by_speed: bool,
}

impl Default for PlotLayers {
    fn default() -> Self {
        Self {
            tree: true,
            nodes: true,
            color_by_speed: true,
        }
    }
}

/// Interactive scene plot (pan, zoom, legend toggles).
pub struct ScenePlotter;

impl ScenePlotter {
    /// Outline of a drawing rectangle, counter-clockwise from its lower-left corner.
    pub fn rect_outline(rect: &DrawRect) -> Vec<[f64; 2]> {
        let (x0, y0) = rect.lower_left();
        let (x1, y1) = rect.upper_right();
        vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
    }

    /// Path color for a speed: blue when slowest, red when fastest.
    pub fn speed_color(speed: f64, range: (f64, f64)) -> Color32 {
        let (min, max) = range;
        let t = if max > min {
            ((speed - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Hsva::new(((1.0 - t) * 2.0 / 3.0) as f32, 0.85, 0.85, 1.0).into()
    }

    /// Path polylines with their colors: one per segment when colored by
    /// speed, otherwise the whole path as a single line.
    pub fn path_lines(scene: &Scene, color_by_speed: bool) -> Vec<(Vec<[f64; 2]>, Color32)> {
        match scene.speed_range.filter(|_| color_by_speed) {
            Some(range) => scene
                .path
                .windows(2)
                .map(|pair| {
                    let speed = (pair[0].speed.unwrap_or(range.0)
                        + pair[1].speed.unwrap_or(range.0))
                        / 2.0;
                    (
                        vec![[pair[0].x, pair[0].y], [pair[1].x, pair[1].y]],
                        Self::speed_color(speed, range),
                    )
                })
                .collect(),
            None if scene.path.is_empty() => Vec::new(),
            None => vec![(
                scene.path.iter().map(|v| [v.x, v.y]).collect(),
                PATH_COLOR,
            )],
        }
    }

    /// Draw the scene, back to front: obstacles, goal, tree, samples, path, start.
    pub fn show(ui: &mut egui::Ui, scene: &Scene, layers: &PlotLayers) {
        let b = scene.bounds;

        Plot::new("rrt_star_scene")
            .data_aspect(1.0)
            .legend(Legend::default())
            .x_axis_label("x")
            .y_axis_label("y")
            .include_x(b.x_min)
            .include_x(b.x_max)
            .include_y(b.y_min)
            .include_y(b.y_max)
            .show(ui, |plot_ui| {
                for rect in &scene.obstacles {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(Self::rect_outline(rect)))
                            .fill_color(OBSTACLE_COLOR.gamma_multiply(REGION_ALPHA))
                            .stroke(Stroke::new(1.0, OBSTACLE_COLOR))
                            .name("Obstacles"),
                    );
                }
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(Self::rect_outline(&scene.goal)))
                        .fill_color(GOAL_COLOR.gamma_multiply(REGION_ALPHA))
                        .stroke(Stroke::new(1.0, GOAL_COLOR))
                        .name("Goal"),
                );

                if layers.tree {
                    for [from, to] in &scene.edges {
                        let points = PlotPoints::from(vec![[from.0, from.1], [to.0, to.1]]);
                        plot_ui.line(Line::new(points).color(EDGE_COLOR).width(1.0).name("Tree"));
                    }
                }

                if layers.nodes && !scene.nodes.is_empty() {
                    let points: PlotPoints = scene.nodes.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(2.0)
                            .color(OBSTACLE_COLOR)
                            .name("Samples"),
                    );
                }

                for (points, color) in Self::path_lines(scene, layers.color_by_speed) {
                    plot_ui.line(
                        Line::new(PlotPoints::from(points))
                            .color(color)
                            .width(3.0)
                            .name("Optimal path"),
                    );
                }
                if !scene.path.is_empty() {
                    let markers: PlotPoints = scene.path.iter().map(|v| [v.x, v.y]).collect();
                    plot_ui.points(
                        Points::new(markers)
                            .shape(MarkerShape::Asterisk)
                            .radius(5.0)
                            .color(PATH_COLOR)
                            .name("Optimal path"),
                    );
                }

                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[scene.start.0, scene.start.1]]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(8.0)
                        .color(GOAL_COLOR)
                        .name("Start"),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EnvironmentRecord, PathPoint, RunData, TreeEdge};
    use crate::geometry::{Point, Rect};
    use crate::scene::{Anchor, SceneBuilder};

    fn scene(with_velocity: bool) -> Scene {
        let velocity = |v: (f64, f64)| with_velocity.then_some(v);
        let run = RunData {
            nodes: vec![Point::new(1.0, 48.0), Point::new(5.0, 44.0)],
            path: vec![
                PathPoint::new(Point::new(1.0, 48.0), velocity((0.0, 0.0))),
                PathPoint::new(Point::new(5.0, 44.0), velocity((4.0, -3.0))),
                PathPoint::new(Point::new(45.0, 48.0), velocity((5.0, 0.0))),
            ],
            obstacles: vec![Rect::new(10.0, 50.0, 2.0, 45.0)],
            tree: vec![TreeEdge {
                from: Point::new(5.0, 44.0),
                to: Point::new(1.0, 48.0),
            }],
            environment: EnvironmentRecord {
                extent: (50.0, 50.0),
                start: Point::new(1.0, 48.0),
                goal: Rect::new(43.0, 49.0, 7.0, 2.0),
            },
        };
        SceneBuilder::build(&run, Anchor::TopLeft)
    }

    #[test]
    fn obstacle_outline_follows_the_drawn_rectangle() {
        let s = scene(true);
        let outline = ScenePlotter::rect_outline(&s.obstacles[0]);
        assert_eq!(
            outline,
            vec![[10.0, 5.0], [12.0, 5.0], [12.0, 50.0], [10.0, 50.0]]
        );
    }

    #[test]
    fn speed_colored_path_has_one_line_per_segment() {
        let lines = ScenePlotter::path_lines(&scene(true), true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, vec![[1.0, 48.0], [5.0, 44.0]]);
        assert_ne!(lines[0].1, lines[1].1);
    }

    #[test]
    fn plain_path_is_a_single_line() {
        let without_velocity = ScenePlotter::path_lines(&scene(false), true);
        assert_eq!(without_velocity.len(), 1);
        assert_eq!(without_velocity[0].0.len(), 3);
        assert_eq!(without_velocity[0].1, PATH_COLOR);

        let uncolored = ScenePlotter::path_lines(&scene(true), false);
        assert_eq!(uncolored.len(), 1);
    }

    #[test]
    fn slow_is_blue_and_fast_is_red() {
        let slow = ScenePlotter::speed_color(0.0, (0.0, 1.0));
        let fast = ScenePlotter::speed_color(1.0, (0.0, 1.0));

        assert!(slow.b() > slow.r());
        assert!(fast.r() > fast.b());
    }

    #[test]
    fn scene_draws_in_a_headless_frame() {
        let s = scene(true);
        let ctx = egui::Context::default();

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ScenePlotter::show(ui, &s, &PlotLayers::default());
            });
        });
        assert!(!output.shapes.is_empty());
    }
}
