//! Data module - run file loading and writing

mod loader;
mod records;
mod writer;

pub use loader::{LoaderError, RunLoader};
pub use records::{
    EnvironmentRecord, PathPoint, RunData, TreeEdge, ENVIRONMENT_FILE, NODES_FILE,
    OBSTACLES_FILE, PATH_FILE, SPEED_NORMALISATION, TREE_FILE,
};
pub use writer::{RunWriter, WriterError};
