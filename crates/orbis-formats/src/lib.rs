//! Mesh file formats: PLY and STL writers, ASC point clouds.
//!
//! Writers stream straight from a [`Mesh`]; nothing is buffered beyond the
//! caller's writer. [`write_mesh_file`] wraps the target in a `BufWriter`.

mod asc;
mod error;
mod number;
mod ply;
mod stl;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use orbis_sphere::{Mesh, mesh_from_rows};
use serde::{Deserialize, Serialize};

pub use asc::{FastAngle, find_fast_angle, read_asc, recover_rows, write_asc};
pub use error::FormatError;
pub use number::format_g;
pub use ply::{ply_header, write_ply};
pub use stl::write_stl;

/// Supported output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Polygon file format, binary unless ASCII is requested.
    #[default]
    Ply,
    /// Binary stereolithography.
    Stl,
    /// Bare `x y z` point list.
    Asc,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ply => "ply",
            Self::Stl => "stl",
            Self::Asc => "asc",
        }
    }

    /// Format implied by a path's extension, if recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ply" => Ok(Self::Ply),
            "stl" => Ok(Self::Stl),
            "asc" => Ok(Self::Asc),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Per-write options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Write text instead of binary where the format allows it.
    pub ascii: bool,
    /// Flip every face's orientation.
    pub invert: bool,
}

/// Write `mesh` to `out` in the given format.
///
/// # Errors
///
/// [`FormatError::Unsupported`] for ASCII STL, otherwise whatever the
/// underlying writer raises.
pub fn write_mesh<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    format: OutputFormat,
    options: WriteOptions,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Ply => write_ply(out, mesh, !options.ascii, options.invert),
        OutputFormat::Stl if options.ascii => Err(FormatError::Unsupported {
            format: "stl",
            option: "ascii output",
        }),
        OutputFormat::Stl => write_stl(out, mesh, options.invert),
        OutputFormat::Asc => write_asc(out, mesh),
    }
}

/// Create (or truncate) `path` and write `mesh` to it.
pub fn write_mesh_file(
    path: &Path,
    mesh: &Mesh,
    format: OutputFormat,
    options: WriteOptions,
) -> Result<(), FormatError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_mesh(&mut out, mesh, format, options)?;
    out.flush()?;
    tracing::info!(
        path = %path.display(),
        format = %format,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "mesh written"
    );
    Ok(())
}

/// Read an ASC file and triangulate its recovered rows into a mesh.
///
/// `row_length` forces fixed-size rows; 0 detects them from the angles.
pub fn mesh_from_asc_file(path: &Path, row_length: usize) -> Result<Mesh, FormatError> {
    let points = read_asc(BufReader::new(File::open(path)?))?;
    tracing::info!(path = %path.display(), points = points.len(), "point cloud read");
    Ok(mesh_from_rows(recover_rows(&points, row_length))?)
}
