//! Application error type: every library error plus the checks made before
//! any output is written.

use std::path::PathBuf;

use orbis_config::ConfigError;
use orbis_formats::FormatError;
use orbis_heights::HeightsError;
use orbis_sphere::MeshError;

/// Errors that end a run with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The input file does not exist.
    #[error("file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// The output file exists and overwriting was not requested.
    #[error("file {} already exists (use --overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading an image failed.
    #[error(transparent)]
    Heights(#[from] HeightsError),

    /// Building the mesh failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Reading or writing a mesh file failed.
    #[error(transparent)]
    Format(#[from] FormatError),
}
