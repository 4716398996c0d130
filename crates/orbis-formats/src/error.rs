//! Mesh file error types.

use orbis_sphere::{MeshError, PointId};

/// Errors raised while writing or reading mesh files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format name is not recognised.
    #[error("unknown mesh format: {0}")]
    UnknownFormat(String),

    /// The format cannot represent the requested option.
    #[error("{format} does not support {option}")]
    Unsupported {
        /// Format name.
        format: &'static str,
        /// Offending option.
        option: &'static str,
    },

    /// A face references a point the mesh does not contain.
    #[error("face references missing point {0}")]
    MissingPoint(PointId),

    /// PLY stores vertex indices as 32-bit signed integers.
    #[error("{0} vertices exceed the 32-bit index range")]
    TooManyVertices(u64),

    /// A line of a point file could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Triangulating recovered rows failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
