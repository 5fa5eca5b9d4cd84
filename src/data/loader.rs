//! Run File Loader Module
//! Reads the CSV files of a planner run into typed records using Polars.

use crate::data::records::{
    EnvironmentRecord, PathPoint, RunData, TreeEdge, ENVIRONMENT_FILE, NODES_FILE,
    OBSTACLES_FILE, PATH_FILE, TREE_FILE,
};
use crate::geometry::{Point, Rect};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
    #[error("{path}: row {row} has {found} fields, expected {expected}")]
    ColumnCount {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{path}: row {row} has no value for '{column}'")]
    MissingField {
        path: PathBuf,
        row: usize,
        column: String,
    },
    #[error("{path}: expected 3 rows (extent, start, goal), found {found}")]
    IncompleteEnvironment { path: PathBuf, found: usize },
}

const POINT_COLUMNS: [&str; 2] = ["x", "y"];
const PATH_COLUMNS: [&str; 4] = ["x", "y", "vx", "vy"];
const RECT_COLUMNS: [&str; 4] = ["x", "y", "width", "height"];
const TREE_COLUMNS: [&str; 2] = ["from", "to"];

/// Loads planner run files.
///
/// Blank lines are skipped everywhere, and a file without any rows yields an
/// empty sequence rather than an error.
pub struct RunLoader;

impl RunLoader {
    /// Load all five files from a run directory.
    pub fn load_run(dir: &Path) -> Result<RunData, LoaderError> {
        let run = RunData {
            nodes: Self::load_nodes(&dir.join(NODES_FILE))?,
            path: Self::load_path(&dir.join(PATH_FILE))?,
            obstacles: Self::load_obstacles(&dir.join(OBSTACLES_FILE))?,
            tree: Self::load_tree(&dir.join(TREE_FILE))?,
            environment: Self::load_environment(&dir.join(ENVIRONMENT_FILE))?,
        };

        tracing::info!(
            dir = %dir.display(),
            nodes = run.nodes.len(),
            path = run.path.len(),
            obstacles = run.obstacles.len(),
            edges = run.tree.len(),
            "loaded planner run"
        );
        Ok(run)
    }

    /// Sampled nodes: rows of `x,y`.
    pub fn load_nodes(path: &Path) -> Result<Vec<Point>, LoaderError> {
        let rows = Self::read_rows(path)?;
        let values = Self::parse_floats(path, &rows, ',', &POINT_COLUMNS)?;
        Ok(values.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }

    /// Optimal path: rows of `x,y,vx,vy`, or `x,y` for planners without
    /// velocity state.
    pub fn load_path(path: &Path) -> Result<Vec<PathPoint>, LoaderError> {
        let rows = Self::read_rows(path)?;
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        if first.split(',').count() == POINT_COLUMNS.len() {
            let values = Self::parse_floats(path, &rows, ',', &POINT_COLUMNS)?;
            return Ok(values
                .into_iter()
                .map(|[x, y]| PathPoint::new(Point::new(x, y), None))
                .collect());
        }

        let values = Self::parse_floats(path, &rows, ',', &PATH_COLUMNS)?;
        Ok(values
            .into_iter()
            .map(|[x, y, vx, vy]| PathPoint::new(Point::new(x, y), Some((vx, vy))))
            .collect())
    }

    /// Obstacles: rows of `x,y,width,height`, top-left anchored.
    pub fn load_obstacles(path: &Path) -> Result<Vec<Rect>, LoaderError> {
        let rows = Self::read_rows(path)?;
        let values = Self::parse_floats(path, &rows, ',', &RECT_COLUMNS)?;
        Ok(values
            .into_iter()
            .map(|[x, y, w, h]| Rect::new(x, y, w, h))
            .collect())
    }

    /// Tree edges: rows of two points, each `x,y`, separated by spaces or
    /// tabs.
    pub fn load_tree(path: &Path) -> Result<Vec<TreeEdge>, LoaderError> {
        let rows: Vec<String> = Self::read_rows(path)?
            .iter()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        for (row, line) in rows.iter().enumerate() {
            Self::check_field_count(path, row, TREE_COLUMNS.len(), line.split(' ').count())?;
        }

        let df = Self::read_frame(path, &rows, b' ', &TREE_COLUMNS, DataType::String)?;
        let from = Self::string_column(path, &df, TREE_COLUMNS[0])?;
        let to = Self::string_column(path, &df, TREE_COLUMNS[1])?;

        let from = Self::parse_floats(path, &from, ',', &POINT_COLUMNS)?;
        let to = Self::parse_floats(path, &to, ',', &POINT_COLUMNS)?;
        Ok(from
            .into_iter()
            .zip(to)
            .map(|([fx, fy], [tx, ty])| TreeEdge {
                from: Point::new(fx, fy),
                to: Point::new(tx, ty),
            })
            .collect())
    }

    /// Environment: extent, start and goal rectangle on three positional rows.
    pub fn load_environment(path: &Path) -> Result<EnvironmentRecord, LoaderError> {
        let rows = Self::read_rows(path)?;
        if rows.len() < 3 {
            return Err(LoaderError::IncompleteEnvironment {
                path: path.to_path_buf(),
                found: rows.len(),
            });
        }

        let [ex, ey] = Self::single_row(path, &rows[0], &POINT_COLUMNS)?;
        let [sx, sy] = Self::single_row(path, &rows[1], &POINT_COLUMNS)?;
        let [gx, gy, gw, gh] = Self::single_row(path, &rows[2], &RECT_COLUMNS)?;

        Ok(EnvironmentRecord {
            extent: (ex, ey),
            start: Point::new(sx, sy),
            goal: Rect::new(gx, gy, gw, gh),
        })
    }

    /// Read a file and return its non-blank lines, trimmed.
    fn read_rows(path: &Path) -> Result<Vec<String>, LoaderError> {
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(path = %path.display(), rows = rows.len(), "read run file");
        Ok(rows)
    }

    fn single_row<const N: usize>(
        path: &Path,
        row: &str,
        columns: &[&str; N],
    ) -> Result<[f64; N], LoaderError> {
        Self::parse_floats(path, &[row], ',', columns)?
            .pop()
            .ok_or_else(|| LoaderError::MissingField {
                path: path.to_path_buf(),
                row: 0,
                column: columns[0].to_string(),
            })
    }

    fn check_field_count(
        path: &Path,
        row: usize,
        expected: usize,
        found: usize,
    ) -> Result<(), LoaderError> {
        if expected == found {
            Ok(())
        } else {
            Err(LoaderError::ColumnCount {
                path: path.to_path_buf(),
                row,
                expected,
                found,
            })
        }
    }

    /// Read headerless rows into a frame with one `dtype` column per name.
    fn read_frame<S: AsRef<str>>(
        path: &Path,
        rows: &[S],
        separator: u8,
        columns: &[&str],
        dtype: DataType,
    ) -> Result<DataFrame, LoaderError> {
        let schema = Schema::from_iter(
            columns
                .iter()
                .map(|name| Field::new((*name).into(), dtype.clone())),
        );
        let body = rows
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");

        CsvReadOptions::default()
            .with_has_header(false)
            .with_schema(Some(Arc::new(schema)))
            .map_parse_options(|opts| opts.with_separator(separator))
            .into_reader_with_file_handle(Cursor::new(body.into_bytes()))
            .finish()
            .map_err(|source| LoaderError::Csv {
                path: path.to_path_buf(),
                source,
            })
    }

    fn string_column(
        path: &Path,
        df: &DataFrame,
        name: &str,
    ) -> Result<Vec<String>, LoaderError> {
        let csv_error = |source: PolarsError| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let values = df.column(name).map_err(csv_error)?;
        values
            .str()
            .map_err(csv_error)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .map(str::to_string)
                    .ok_or_else(|| LoaderError::MissingField {
                        path: path.to_path_buf(),
                        row,
                        column: name.to_string(),
                    })
            })
            .collect()
    }

    /// Parse headerless rows into fixed-width float records.
    fn parse_floats<const N: usize, S: AsRef<str>>(
        path: &Path,
        rows: &[S],
        separator: char,
        columns: &[&str; N],
    ) -> Result<Vec<[f64; N]>, LoaderError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        for (row, line) in rows.iter().enumerate() {
            Self::check_field_count(path, row, N, line.as_ref().split(separator).count())?;
        }

        let csv_error = |source: PolarsError| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let df = Self::read_frame(path, rows, separator as u8, columns, DataType::Float64)?;

        let mut records = vec![[0.0; N]; df.height()];
        for (c, name) in columns.iter().enumerate() {
            let column = df
                .column(name)
                .and_then(|col| col.cast(&DataType::Float64))
                .map_err(csv_error)?;
            let values = column.f64().map_err(csv_error)?;

            for (row, value) in values.into_iter().enumerate() {
                records[row][c] = value.ok_or_else(|| LoaderError::MissingField {
                    path: path.to_path_buf(),
                    row,
                    column: name.to_string(),
                })?;
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn loads_nodes_and_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), NODES_FILE, "1.5,2\n\n3,4.25\n");

        let nodes = RunLoader::load_nodes(&path).expect("nodes");
        assert_eq!(nodes, vec![Point::new(1.5, 2.0), Point::new(3.0, 4.25)]);
    }

    #[test]
    fn empty_file_is_an_empty_sequence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nodes = write(dir.path(), NODES_FILE, "");
        let obstacles = write(dir.path(), OBSTACLES_FILE, "\n\n");
        let tree = write(dir.path(), TREE_FILE, "");
        let path = write(dir.path(), PATH_FILE, "");

        assert!(RunLoader::load_nodes(&nodes).expect("nodes").is_empty());
        assert!(RunLoader::load_obstacles(&obstacles)
            .expect("obstacles")
            .is_empty());
        assert!(RunLoader::load_tree(&tree).expect("tree").is_empty());
        assert!(RunLoader::load_path(&path).expect("path").is_empty());
    }

    #[test]
    fn path_rows_carry_velocity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), PATH_FILE, "0,0,3,4\n\n1,1,0,0\n\n");

        let points = RunLoader::load_path(&path).expect("path");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].velocity, Some((3.0, 4.0)));
        assert_relative_eq!(points[0].speed().unwrap_or(f64::NAN), 1.0);
        assert_relative_eq!(points[1].speed().unwrap_or(f64::NAN), 0.0);
    }

    #[test]
    fn path_rows_without_velocity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), PATH_FILE, "1,48\n1.5,48\n");

        let points = RunLoader::load_path(&path).expect("path");
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.velocity.is_none()));
    }

    #[test]
    fn tree_row_parses_two_points() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), TREE_FILE, "1.0,2.0 3.0,4.0\n");

        let edges = RunLoader::load_tree(&path).expect("tree");
        assert_eq!(
            edges,
            vec![TreeEdge {
                from: Point::new(1.0, 2.0),
                to: Point::new(3.0, 4.0),
            }]
        );
    }

    #[test]
    fn tree_rows_accept_runs_of_spaces_and_tabs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), TREE_FILE, "1.0,2.0   3.0,4.0\n5,6\t7,8\n");

        let edges = RunLoader::load_tree(&path).expect("tree");
        assert_eq!(
            edges,
            vec![
                TreeEdge {
                    from: Point::new(1.0, 2.0),
                    to: Point::new(3.0, 4.0),
                },
                TreeEdge {
                    from: Point::new(5.0, 6.0),
                    to: Point::new(7.0, 8.0),
                },
            ]
        );

        let three = write(dir.path(), "three.csv", "1,2 3,4 5,6\n");
        assert!(matches!(
            RunLoader::load_tree(&three),
            Err(LoaderError::ColumnCount {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn environment_rows_are_positional() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), ENVIRONMENT_FILE, "100,100\n5,5\n80,10,15,15\n");

        let env = RunLoader::load_environment(&path).expect("environment");
        assert_eq!(env.extent, (100.0, 100.0));
        assert_eq!(env.start, Point::new(5.0, 5.0));
        assert_eq!(env.goal, Rect::new(80.0, 10.0, 15.0, 15.0));
    }

    #[test]
    fn short_environment_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), ENVIRONMENT_FILE, "100,100\n5,5\n");

        let err = RunLoader::load_environment(&path).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::IncompleteEnvironment { found: 2, .. }
        ));
    }

    #[test]
    fn malformed_rows_fail() {
        let dir = tempfile::tempdir().expect("tempdir");
        let short = write(dir.path(), OBSTACLES_FILE, "10,20,5\n");
        let text = write(dir.path(), NODES_FILE, "1,abc\n");
        let tree = write(dir.path(), TREE_FILE, "1.0,2.0,3.0,4.0\n");

        assert!(matches!(
            RunLoader::load_obstacles(&short),
            Err(LoaderError::ColumnCount {
                expected: 4,
                found: 3,
                ..
            })
        ));
        assert!(RunLoader::load_nodes(&text).is_err());
        assert!(RunLoader::load_tree(&tree).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = RunLoader::load_nodes(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
