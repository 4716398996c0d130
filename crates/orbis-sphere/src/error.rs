//! Mesh generation error types.

/// Errors raised while validating settings or assembling a mesh.
///
/// Projection domain misses are not errors: samples outside a projection's
/// valid region are skipped silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The triangulator was handed an empty row.
    #[error("cannot triangulate an empty row")]
    EmptyRow,

    /// A patch boundary used for stitching contained no points.
    #[error("patch boundary has no points; patch sequencing is corrupted")]
    EmptyBoundary,

    /// No map row survived sampling, so there is nothing to stitch to.
    #[error("map produced no rows (cap angle {cap_deg:.3} deg leaves no latitude band)")]
    EmptyMap {
        /// Cap boundary latitude in degrees.
        cap_deg: f64,
    },

    /// A height or color field has no cells.
    #[error("height field is empty ({width}x{height})")]
    EmptyHeightField {
        /// Raster width.
        width: usize,
        /// Raster height.
        height: usize,
    },

    /// A raster buffer does not match its declared dimensions.
    #[error("field data has {actual} cells, expected {expected}")]
    FieldSizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// The projection name is not recognised.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    /// Cap angle outside `(0, 90)` degrees.
    #[error("caps angle must be > 0 and < 90 degrees, got {0}")]
    InvalidCaps(f64),

    /// Meridian list is malformed.
    #[error("invalid meridians: {0}")]
    InvalidMeridians(String),

    /// Shell thickness outside `[0, 1)`.
    #[error("thickness must be >= 0 and < 1, got {0}")]
    InvalidThickness(f64),

    /// Non-finite or negative elevation scale.
    #[error("scale must be finite and >= 0, got {0}")]
    InvalidScale(f64),
}
