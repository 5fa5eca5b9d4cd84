//! Scene Renderer
//! Draws a planner run scene with plotters, to PNG or SVG.
//!
//! Draw order (back to front):
//! 1. Obstacles and goal region (translucent rectangles)
//! 2. Search tree edges
//! 3. Sampled nodes
//! 4. Optimal path, optionally colored by speed
//! 5. Start point

use crate::scene::{Bounds, Scene};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

// Colors
const PATH_BLUE: RGBColor = RGBColor(31, 119, 180);
const NODE_RED: RGBColor = RGBColor(214, 39, 40);
const START_GREEN: RGBColor = RGBColor(44, 160, 44);
const EDGE_GRAY: RGBColor = RGBColor(190, 190, 190);
const REGION_ALPHA: f64 = 0.3;

// Marker sizes (pixels)
const NODE_RADIUS: u32 = 2;
const START_RADIUS: u32 = 15;
const PATH_MARKER: u32 = 5;
const PATH_WIDTH: u32 = 3;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Unsupported image format for {0} (expected .png or .svg)")]
    UnsupportedFormat(String),
    #[error("Failed to open viewer: {0}")]
    Open(#[from] std::io::Error),
}

/// Output image encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Draw the mesh with tick labels. Needs a system font.
    pub axis_labels: bool,
    /// Color path segments by speed when the path carries velocities.
    pub color_by_speed: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1600,
            axis_labels: true,
            color_by_speed: true,
        }
    }
}

pub struct SceneRenderer;

impl SceneRenderer {
    /// Render the scene to an image file; the extension picks the encoder.
    pub fn render_to_file(
        scene: &Scene,
        path: &Path,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let size = (options.width, options.height);
        match ImageFormat::from_path(path)? {
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw(&root, scene, options)?;
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw(&root, scene, options)?;
            }
        }

        tracing::info!(output = %path.display(), "rendered plot");
        Ok(())
    }

    /// Render the scene into an in-memory SVG document.
    pub fn render_svg_string(scene: &Scene, options: &RenderOptions) -> Result<String, RenderError> {
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (options.width, options.height))
                .into_drawing_area();
            Self::draw(&root, scene, options)?;
        }
        Ok(buffer)
    }

    /// Hand a rendered image to the desktop's default viewer.
    pub fn show(path: &Path) -> Result<(), RenderError> {
        open::that(path)?;
        Ok(())
    }

    /// Path color for a speed: blue when slowest, red when fastest.
    pub fn speed_color(speed: f64, range: (f64, f64)) -> HSLColor {
        let (min, max) = range;
        let t = if max > min {
            ((speed - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        HSLColor((1.0 - t) * 2.0 / 3.0, 1.0, 0.45)
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        scene: &Scene,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_error)?;

        let b = Self::padded(scene.bounds);
        let label_area = if options.axis_labels { 50 } else { 0 };

        let mut chart = ChartBuilder::on(root)
            .margin(20)
            .x_label_area_size(label_area)
            .y_label_area_size(label_area)
            .build_cartesian_2d(b.x_min..b.x_max, b.y_min..b.y_max)
            .map_err(draw_error)?;

        if options.axis_labels {
            chart
                .configure_mesh()
                .x_labels(Bounds::tick_count(b.x_min, b.x_max, scene.tick_step))
                .y_labels(Bounds::tick_count(b.y_min, b.y_max, scene.tick_step))
                .x_label_formatter(&|v| format!("{:.0}", v))
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()
                .map_err(draw_error)?;
        }

        // Obstacles and goal region
        chart
            .draw_series(scene.obstacles.iter().map(|r| {
                Rectangle::new(
                    [r.lower_left(), r.upper_right()],
                    NODE_RED.mix(REGION_ALPHA).filled(),
                )
            }))
            .map_err(draw_error)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [scene.goal.lower_left(), scene.goal.upper_right()],
                START_GREEN.mix(REGION_ALPHA).filled(),
            )))
            .map_err(draw_error)?;

        // Tree and samples
        chart
            .draw_series(
                scene
                    .edges
                    .iter()
                    .map(|edge| PathElement::new(edge.to_vec(), EDGE_GRAY.stroke_width(1))),
            )
            .map_err(draw_error)?;
        chart
            .draw_series(
                scene
                    .nodes
                    .iter()
                    .map(|&p| Circle::new(p, NODE_RADIUS, NODE_RED.filled())),
            )
            .map_err(draw_error)?;

        // Optimal path
        match scene.speed_range.filter(|_| options.color_by_speed) {
            Some(range) => {
                chart
                    .draw_series(scene.path.windows(2).map(|pair| {
                        let speed = (pair[0].speed.unwrap_or(range.0)
                            + pair[1].speed.unwrap_or(range.0))
                            / 2.0;
                        PathElement::new(
                            vec![(pair[0].x, pair[0].y), (pair[1].x, pair[1].y)],
                            Self::speed_color(speed, range).stroke_width(PATH_WIDTH),
                        )
                    }))
                    .map_err(draw_error)?;
                chart
                    .draw_series(scene.path.iter().map(|v| {
                        let color = Self::speed_color(v.speed.unwrap_or(range.0), range);
                        Cross::new((v.x, v.y), PATH_MARKER, color.stroke_width(2))
                    }))
                    .map_err(draw_error)?;
            }
            None => {
                chart
                    .draw_series(LineSeries::new(
                        scene.path.iter().map(|v| (v.x, v.y)),
                        PATH_BLUE.stroke_width(PATH_WIDTH),
                    ))
                    .map_err(draw_error)?;
                chart
                    .draw_series(
                        scene
                            .path
                            .iter()
                            .map(|v| Cross::new((v.x, v.y), PATH_MARKER, PATH_BLUE.stroke_width(2))),
                    )
                    .map_err(draw_error)?;
            }
        }

        // Start point
        chart
            .draw_series(std::iter::once(Circle::new(
                scene.start,
                START_RADIUS,
                START_GREEN.filled(),
            )))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        Ok(())
    }

    /// Plot ranges must not be empty along either axis.
    fn padded(bounds: Bounds) -> Bounds {
        let mut b = bounds;
        if b.x_max <= b.x_min {
            b.x_max = b.x_min + 1.0;
        }
        if b.y_max <= b.y_min {
            b.y_max = b.y_min + 1.0;
        }
        b
    }
}

fn draw_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
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

    fn unlabeled() -> RenderOptions {
        RenderOptions {
            width: 300,
            height: 300,
            axis_labels: false,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn svg_contains_every_layer() {
        let svg = SceneRenderer::render_svg_string(&scene(true), &unlabeled()).expect("render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn plain_path_renders_without_velocity() {
        let svg = SceneRenderer::render_svg_string(&scene(false), &unlabeled()).expect("render");
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn png_is_written_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("plot.png");

        SceneRenderer::render_to_file(&scene(true), &out, &unlabeled()).expect("render");

        let size = std::fs::metadata(&out).expect("metadata").len();
        assert!(size > 0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ImageFormat::from_path(Path::new("plot.jpg")).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(_)));
        assert_eq!(
            ImageFormat::from_path(Path::new("PLOT.SVG")).expect("svg"),
            ImageFormat::Svg
        );
    }

    #[test]
    fn slow_is_blue_and_fast_is_red() {
        let slow = SceneRenderer::speed_color(0.0, (0.0, 1.0)).to_backend_color().rgb;
        let fast = SceneRenderer::speed_color(1.0, (0.0, 1.0)).to_backend_color().rgb;

        assert!(slow.2 > slow.0);
        assert!(fast.0 > fast.2);
    }
}
