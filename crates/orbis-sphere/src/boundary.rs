//! Boundary extraction: the outer ring of a patch whose rows are not
//! latitude rings (logos), usable as a triangulator row for stitching.

use crate::error::MeshError;
use crate::mesh::Row;

/// Tolerance on normalised `z` when selecting boundary points.
pub const BOUNDARY_EPSILON: f64 = 1e-6;

/// Which side of a patch to extract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extreme {
    /// Points nearest the equator of a north patch (its southern rim).
    Lowest,
    /// Points nearest the equator of a south patch (its northern rim).
    Highest,
}

/// Points of `rows` lying on the patch rim at the given extreme, sorted by
/// azimuth so they form a coherent ring.
///
/// The rim is made of the first and last point of every row. Its mean
/// normalised `z` is the threshold: [`Extreme::Lowest`] keeps every point at
/// or below it, [`Extreme::Highest`] every point at or above it.
///
/// # Errors
///
/// Returns [`MeshError::EmptyBoundary`] if no point qualifies.
pub fn points_at_extreme(rows: &[Row], extreme: Extreme) -> Result<Row, MeshError> {
    let rim: Vec<f64> = rows
        .iter()
        .filter(|row| !row.is_empty())
        .flat_map(|row| {
            let first = row[0].unit().z;
            let last = row[row.len() - 1].unit().z;
            if row.len() > 1 { vec![first, last] } else { vec![first] }
        })
        .collect();
    if rim.is_empty() {
        return Err(MeshError::EmptyBoundary);
    }
    let mean = rim.iter().sum::<f64>() / rim.len() as f64;

    let mut selected: Row = rows
        .iter()
        .flatten()
        .filter(|p| {
            let z = p.unit().z;
            match extreme {
                Extreme::Lowest => z <= mean + BOUNDARY_EPSILON,
                Extreme::Highest => z >= mean - BOUNDARY_EPSILON,
            }
        })
        .copied()
        .collect();
    if selected.is_empty() {
        return Err(MeshError::EmptyBoundary);
    }

    selected.sort_by(|a, b| a.azimuth().total_cmp(&b.azimuth()));
    Ok(selected)
}
