//! Scene Layout Module
//! Turns loaded run records into drawable geometry: anchored rectangles,
//! per-point speeds, plot bounds and tick spacing.

use crate::data::RunData;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Spacing between axis ticks, in environment units.
pub const TICK_STEP: f64 = 10.0;

/// Most tick labels one axis asks for.
pub const MAX_TICKS: usize = 1000;

/// Which corner the `(x, y)` of an obstacle or goal row names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// `(x, y)` is the top-left corner; the rectangle hangs below it.
    #[default]
    TopLeft,
    /// `(x, y)` is the bottom-left corner.
    BottomLeft,
}

/// Rectangle in drawing coordinates, anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    pub fn lower_left(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn upper_right(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height)
    }
}

/// One vertex of the drawn optimal path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    pub x: f64,
    pub y: f64,
    pub speed: Option<f64>,
}

/// Inclusive plot range along both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn from_extent(extent: (f64, f64)) -> Self {
        Self {
            x_min: extent.0.min(0.0),
            x_max: extent.0.max(0.0),
            y_min: extent.1.min(0.0),
            y_max: extent.1.max(0.0),
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    fn include_rect(&mut self, rect: &DrawRect) {
        let (x0, y0) = rect.lower_left();
        let (x1, y1) = rect.upper_right();
        self.include(x0, y0);
        self.include(x1, y1);
    }

    /// Number of tick labels covering `[min, max]` at `step` spacing,
    /// capped at [`MAX_TICKS`]. A non-finite span gets a single tick.
    pub fn tick_count(min: f64, max: f64, step: f64) -> usize {
        let span = max - min;
        if !(step > 0.0) || !span.is_finite() || span <= 0.0 {
            return 1;
        }
        let steps = (span / step).floor();
        if steps >= (MAX_TICKS - 1) as f64 {
            MAX_TICKS
        } else {
            steps as usize + 1
        }
    }
}

/// Everything the renderer draws, already in drawing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub extent: (f64, f64),
    pub bounds: Bounds,
    pub nodes: Vec<(f64, f64)>,
    pub edges: Vec<[(f64, f64); 2]>,
    pub path: Vec<PathVertex>,
    pub start: (f64, f64),
    pub goal: DrawRect,
    pub obstacles: Vec<DrawRect>,
    /// `(min, max)` speed along the path when every vertex has one.
    pub speed_range: Option<(f64, f64)>,
    pub tick_step: f64,
}

/// Builds a [`Scene`] from run records.
pub struct SceneBuilder;

impl SceneBuilder {
    pub fn build(run: &RunData, anchor: Anchor) -> Scene {
        let env = &run.environment;

        let goal = Self::anchor_rect(&env.goal, anchor);
        let obstacles: Vec<DrawRect> = run
            .obstacles
            .iter()
            .map(|ob| Self::anchor_rect(ob, anchor))
            .collect();

        let path: Vec<PathVertex> = run
            .path
            .iter()
            .map(|p| PathVertex {
                x: p.position.x,
                y: p.position.y,
                speed: p.speed(),
            })
            .collect();

        let nodes: Vec<(f64, f64)> = run.nodes.iter().map(Self::xy).collect();
        let edges: Vec<[(f64, f64); 2]> = run
            .tree
            .iter()
            .map(|e| [Self::xy(&e.from), Self::xy(&e.to)])
            .collect();
        let start = Self::xy(&env.start);

        let mut bounds = Bounds::from_extent(env.extent);
        bounds.include(start.0, start.1);
        bounds.include_rect(&goal);
        for rect in &obstacles {
            bounds.include_rect(rect);
        }
        for &(x, y) in nodes.iter().chain(edges.iter().flatten()) {
            bounds.include(x, y);
        }
        for v in &path {
            bounds.include(v.x, v.y);
        }

        let speed_range = Self::speed_range(&path);

        Scene {
            extent: env.extent,
            bounds,
            nodes,
            edges,
            path,
            start,
            goal,
            obstacles,
            speed_range,
            tick_step: TICK_STEP,
        }
    }

    /// Convert a file rectangle to a lower-left anchored drawing rectangle.
    pub fn anchor_rect(rect: &Rect, anchor: Anchor) -> DrawRect {
        let y = match anchor {
            Anchor::TopLeft => rect.y - rect.height,
            Anchor::BottomLeft => rect.y,
        };
        DrawRect {
            x: rect.x,
            y,
            width: rect.width,
            height: rect.height,
        }
    }

    fn speed_range(path: &[PathVertex]) -> Option<(f64, f64)> {
        let speeds: Option<Vec<f64>> = path.iter().map(|v| v.speed).collect();
        let speeds = speeds.filter(|s| !s.is_empty())?;

        let min = speeds.iter().copied().fold(f64::INFINITY, f64::min);
        let max = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    fn xy(p: &Point) -> (f64, f64) {
        (p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EnvironmentRecord, PathPoint, TreeEdge};
    use approx::assert_relative_eq;

    fn run() -> RunData {
        RunData {
            nodes: vec![Point::new(5.0, 5.0), Point::new(6.0, 6.0)],
            path: vec![
                PathPoint::new(Point::new(5.0, 5.0), Some((0.0, 0.0))),
                PathPoint::new(Point::new(6.0, 6.0), Some((3.0, 4.0))),
            ],
            obstacles: vec![Rect::new(10.0, 20.0, 5.0, 8.0)],
            tree: vec![TreeEdge {
                from: Point::new(6.0, 6.0),
                to: Point::new(5.0, 5.0),
            }],
            environment: EnvironmentRecord {
                extent: (100.0, 100.0),
                start: Point::new(5.0, 5.0),
                goal: Rect::new(80.0, 10.0, 15.0, 15.0),
            },
        }
    }

    #[test]
    fn obstacle_is_drawn_below_its_top_left_corner() {
        let rect = SceneBuilder::anchor_rect(&Rect::new(10.0, 20.0, 5.0, 8.0), Anchor::TopLeft);
        assert_eq!(
            rect,
            DrawRect {
                x: 10.0,
                y: 12.0,
                width: 5.0,
                height: 8.0
            }
        );
    }

    #[test]
    fn bottom_left_anchor_keeps_the_corner() {
        let rect =
            SceneBuilder::anchor_rect(&Rect::new(10.0, 20.0, 5.0, 8.0), Anchor::BottomLeft);
        assert_eq!(rect.lower_left(), (10.0, 20.0));
        assert_eq!(rect.upper_right(), (15.0, 28.0));
    }

    #[test]
    fn environment_goal_and_bounds() {
        let scene = SceneBuilder::build(&run(), Anchor::TopLeft);

        assert_eq!(scene.extent, (100.0, 100.0));
        assert_eq!(scene.start, (5.0, 5.0));
        assert_eq!(
            scene.goal,
            DrawRect {
                x: 80.0,
                y: -5.0,
                width: 15.0,
                height: 15.0
            }
        );
        // The goal hangs below the x axis, so the bounds grow to show it.
        assert_eq!(scene.bounds.y_min, -5.0);
        assert_eq!(scene.bounds.x_max, 100.0);
        assert_eq!(scene.tick_step, TICK_STEP);
    }

    #[test]
    fn speed_range_spans_the_path() {
        let scene = SceneBuilder::build(&run(), Anchor::TopLeft);
        let (min, max) = scene.speed_range.expect("speed range");
        assert_relative_eq!(min, 0.0);
        assert_relative_eq!(max, 1.0);
        assert!(scene.path.iter().all(|v| v.speed.unwrap_or(-1.0) >= 0.0));
    }

    #[test]
    fn positions_only_path_has_no_speed_range() {
        let mut data = run();
        for p in &mut data.path {
            p.velocity = None;
        }
        let scene = SceneBuilder::build(&data, Anchor::TopLeft);
        assert!(scene.speed_range.is_none());
    }

    #[test]
    fn tick_count_matches_step() {
        assert_eq!(Bounds::tick_count(0.0, 50.0, 10.0), 6);
        assert_eq!(Bounds::tick_count(0.0, 45.0, 10.0), 5);
        assert_eq!(Bounds::tick_count(0.0, 0.0, 10.0), 1);
    }

    #[test]
    fn tick_count_stays_bounded_for_huge_spans() {
        assert_eq!(Bounds::tick_count(0.0, 1e300, 10.0), MAX_TICKS);
        assert_eq!(Bounds::tick_count(-1e308, 1e308, 10.0), 1);
        assert_eq!(Bounds::tick_count(0.0, f64::INFINITY, 10.0), 1);
        assert_eq!(Bounds::tick_count(f64::NAN, 50.0, 10.0), 1);
        assert_eq!(Bounds::tick_count(0.0, 50.0, f64::NAN), 1);
        assert_eq!(Bounds::tick_count(0.0, 9990.0, 10.0), MAX_TICKS);
    }
}
