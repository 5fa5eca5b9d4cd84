//! Run File Writer Module
//! Writes planner results in the run file formats read by [`RunLoader`].
//!
//! [`RunLoader`]: crate::data::RunLoader

use crate::data::records::{
    EnvironmentRecord, PathPoint, RunData, TreeEdge, ENVIRONMENT_FILE, NODES_FILE,
    OBSTACLES_FILE, PATH_FILE, TREE_FILE,
};
use crate::geometry::{Point, Rect};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
}

/// Writes run files, one headerless CSV per record kind.
pub struct RunWriter;

impl RunWriter {
    /// Write all five files into `dir`, creating it when needed.
    pub fn write_run(dir: &Path, run: &RunData) -> Result<(), WriterError> {
        fs::create_dir_all(dir).map_err(|source| WriterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        Self::write_nodes(&dir.join(NODES_FILE), &run.nodes)?;
        Self::write_path(&dir.join(PATH_FILE), &run.path)?;
        Self::write_obstacles(&dir.join(OBSTACLES_FILE), &run.obstacles)?;
        Self::write_tree(&dir.join(TREE_FILE), &run.tree)?;
        Self::write_environment(&dir.join(ENVIRONMENT_FILE), &run.environment)?;

        tracing::info!(dir = %dir.display(), "wrote planner run");
        Ok(())
    }

    pub fn write_nodes(path: &Path, nodes: &[Point]) -> Result<(), WriterError> {
        let xs: Vec<f64> = nodes.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = nodes.iter().map(|p| p.y).collect();
        Self::write_frame(path, vec![("x", xs), ("y", ys)], b',')
    }

    /// Path rows carry velocity only when every point has one.
    pub fn write_path(path: &Path, points: &[PathPoint]) -> Result<(), WriterError> {
        let xs: Vec<f64> = points.iter().map(|p| p.position.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.position.y).collect();

        let velocities: Option<Vec<(f64, f64)>> = points.iter().map(|p| p.velocity).collect();
        match velocities {
            Some(velocities) if !velocities.is_empty() => {
                let vxs = velocities.iter().map(|v| v.0).collect();
                let vys = velocities.iter().map(|v| v.1).collect();
                Self::write_frame(
                    path,
                    vec![("x", xs), ("y", ys), ("vx", vxs), ("vy", vys)],
                    b',',
                )
            }
            _ => Self::write_frame(path, vec![("x", xs), ("y", ys)], b','),
        }
    }

    pub fn write_obstacles(path: &Path, obstacles: &[Rect]) -> Result<(), WriterError> {
        Self::write_frame(path, Self::rect_columns(obstacles), b',')
    }

    /// Tree rows are `from_x,from_y to_x,to_y`.
    pub fn write_tree(path: &Path, edges: &[TreeEdge]) -> Result<(), WriterError> {
        let from: Vec<String> = edges
            .iter()
            .map(|e| format!("{},{}", e.from.x, e.from.y))
            .collect();
        let to: Vec<String> = edges
            .iter()
            .map(|e| format!("{},{}", e.to.x, e.to.y))
            .collect();

        let mut df = DataFrame::new(vec![
            Column::new("from".into(), from),
            Column::new("to".into(), to),
        ])
        .map_err(|source| Self::csv_error(path, source))?;
        Self::encode(path, &mut df, b' ')
    }

    /// The environment file holds three rows of different widths, written as
    /// three single-row frames into the same file.
    pub fn write_environment(path: &Path, env: &EnvironmentRecord) -> Result<(), WriterError> {
        let io_error = |source: std::io::Error| WriterError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_error)?;
        let mut out = BufWriter::new(file);

        let mut frames = [
            Self::frame(
                path,
                vec![("x", vec![env.extent.0]), ("y", vec![env.extent.1])],
            )?,
            Self::frame(path, vec![("x", vec![env.start.x]), ("y", vec![env.start.y])])?,
            Self::frame(path, Self::rect_columns(std::slice::from_ref(&env.goal)))?,
        ];
        for df in frames.iter_mut() {
            CsvWriter::new(&mut out)
                .include_header(false)
                .finish(df)
                .map_err(|source| Self::csv_error(path, source))?;
        }

        out.flush().map_err(io_error)
    }

    fn rect_columns(rects: &[Rect]) -> Vec<(&'static str, Vec<f64>)> {
        vec![
            ("x", rects.iter().map(|r| r.x).collect()),
            ("y", rects.iter().map(|r| r.y).collect()),
            ("width", rects.iter().map(|r| r.width).collect()),
            ("height", rects.iter().map(|r| r.height).collect()),
        ]
    }

    fn frame(path: &Path, columns: Vec<(&str, Vec<f64>)>) -> Result<DataFrame, WriterError> {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column::new(name.into(), values))
            .collect();
        DataFrame::new(columns).map_err(|source| Self::csv_error(path, source))
    }

    fn write_frame(
        path: &Path,
        columns: Vec<(&str, Vec<f64>)>,
        separator: u8,
    ) -> Result<(), WriterError> {
        let mut df = Self::frame(path, columns)?;
        Self::encode(path, &mut df, separator)
    }

    fn encode(path: &Path, df: &mut DataFrame, separator: u8) -> Result<(), WriterError> {
        let mut file = File::create(path).map_err(|source| WriterError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        CsvWriter::new(&mut file)
            .include_header(false)
            .with_separator(separator)
            .finish(df)
            .map_err(|source| Self::csv_error(path, source))?;

        tracing::debug!(path = %path.display(), rows = df.height(), "wrote run file");
        Ok(())
    }

    fn csv_error(path: &Path, source: PolarsError) -> WriterError {
        WriterError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}
