//! Error types for sparsenet-core.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for network construction, traversal and I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed construction or extraction parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An edge endpoint lies outside `[0, vertex_count)`.
    #[error("Vertex {vertex} out of range for network with {vertex_count} vertices")]
    OutOfRange {
        /// The offending vertex index.
        vertex: usize,
        /// Number of vertices in the network.
        vertex_count: usize,
    },

    /// Malformed graph input.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number where the problem was found.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// An edge refers to a node ID that was never declared.
    #[error("Edge references undeclared node {0}")]
    UnknownNode(i64),

    /// A node ID was declared twice.
    #[error("Node {0} declared more than once")]
    DuplicateNode(i64),

    /// Component files already exist in the output directory.
    #[error("Component files already exist: {}", .0.display())]
    OutputExists(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for sparsenet operations.
pub type Result<T> = std::result::Result<T, Error>;
