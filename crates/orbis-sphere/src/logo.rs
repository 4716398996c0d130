//! Logos: a secondary height field laid on a disk over a pole.

use std::f64::consts::FRAC_PI_2;

use crate::error::MeshError;
use crate::field::HeightField;
use crate::mesh::{Patch, Point, PointIds, Row};
use crate::triangulate::faces_for_rows;

/// Fewest points a logo row needs to be kept.
const MIN_ROW_POINTS: usize = 2;

/// Rows of the logo disk inscribed in `heights`, reaching down to `phi_cap`.
///
/// A positive `phi_cap` places the logo on the north pole, a negative one on
/// the south pole (mirrored so it reads correctly from outside). Heights are
/// normalised to `[0, 1]`, multiplied by `scale`, and raised above
/// `caps_height`. Rows keeping fewer than two points are discarded and their
/// ids given back.
pub fn logo_rows(
    heights: &HeightField,
    phi_cap: f64,
    caps_height: f64,
    scale: f64,
    ids: &mut PointIds,
) -> Vec<Row> {
    let sign = if phi_cap > 0.0 { 1.0 } else { -1.0 };
    let abs_phi_cap = phi_cap.abs();

    let (nx, ny) = (heights.width(), heights.height());
    let (nx_2, ny_2) = (nx as f64 / 2.0, ny as f64 / 2.0);
    let n_2 = nx.max(ny) as f64 / 2.0;

    let (hmin, hmax) = heights.range().unwrap_or((0.0, 0.0));
    let span = hmax - hmin;

    let mut rows = Vec::new();
    for j in 0..ny {
        let dy = ny_2 - j as f64;
        let mut row = Row::new();
        for i in 0..nx {
            let dx = i as f64 - nx_2;
            let dist = (dx * dx + dy * dy).sqrt() / n_2;
            if dist > 1.0 {
                continue;
            }
            let h = if span > 0.0 {
                (heights.get(i, j) - hmin) / span
            } else {
                0.0
            };
            let r = caps_height + (caps_height - 1.0) * scale * h;
            let theta = sign * dy.atan2(dx);
            let phi = sign * (FRAC_PI_2 - (FRAC_PI_2 - abs_phi_cap) * dist);
            row.push(Point::spherical(ids.allocate(), r, theta, phi));
        }
        if row.len() >= MIN_ROW_POINTS {
            rows.push(row);
        } else {
            ids.rollback(row.len());
        }
    }
    rows
}

/// Logo patch, triangulated unless `with_faces` is false.
///
/// # Errors
///
/// Returns [`MeshError::EmptyHeightField`] for an empty logo raster.
pub fn logo_patch(
    heights: &HeightField,
    phi_cap: f64,
    caps_height: f64,
    scale: f64,
    with_faces: bool,
    ids: &mut PointIds,
) -> Result<Patch, MeshError> {
    heights.ensure_not_empty()?;
    let rows = logo_rows(heights, phi_cap, caps_height, scale, ids);
    let faces = if with_faces {
        faces_for_rows(&rows)?
    } else {
        Vec::new()
    };
    tracing::debug!(
        rows = rows.len(),
        faces = faces.len(),
        north = phi_cap > 0.0,
        "logo patch"
    );
    Ok(Patch::new(rows, faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Grid;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_points_stay_inside_cap() {
        let heights = Grid::from_fn(21, 21, |i, j| (i + j) as f64);
        let mut ids = PointIds::default();
        let phi_cap = 1.2;
        let rows = logo_rows(&heights, phi_cap, 1.03, 1.0, &mut ids);
        assert!(!rows.is_empty());
        for p in rows.iter().flatten() {
            let z = p.unit().z;
            assert!(z >= phi_cap.sin() - EPSILON, "point below cap: {z}");
        }
    }

    #[test]
    fn test_radius_range_follows_scale() {
        let heights = Grid::from_fn(15, 15, |i, _| i as f64);
        let mut ids = PointIds::default();
        let rows = logo_rows(&heights, 1.0, 1.1, 0.5, &mut ids);
        let radii: Vec<f64> = rows.iter().flatten().map(|p| p.position.length()).collect();
        let lo = radii.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(lo >= 1.1 - EPSILON);
        assert!(hi <= 1.1 + 0.1 * 0.5 + EPSILON);
    }

    #[test]
    fn test_short_rows_are_rolled_back() {
        // The top raster row touches the circle in a single cell.
        let heights = Grid::filled(10, 10, 1.0);
        let mut ids = PointIds::starting_at(5);
        let rows = logo_rows(&heights, 1.0, 1.0, 1.0, &mut ids);
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|row| row.len() >= 2));
        let all: Vec<u64> = rows.iter().flatten().map(|p| p.id).collect();
        assert_eq!(all, (5..5 + all.len() as u64).collect::<Vec<_>>());
        assert_eq!(ids.peek(), 5 + all.len() as u64);
    }

    #[test]
    fn test_south_logo_is_mirrored() {
        let heights = Grid::filled(11, 11, 0.0);
        let mut north_ids = PointIds::default();
        let mut south_ids = PointIds::default();
        let north = logo_rows(&heights, 1.1, 1.0, 1.0, &mut north_ids);
        let south = logo_rows(&heights, -1.1, 1.0, 1.0, &mut south_ids);
        for (n, s) in north.iter().flatten().zip(south.iter().flatten()) {
            assert!((n.position.x - s.position.x).abs() < EPSILON);
            assert!((n.position.y + s.position.y).abs() < EPSILON);
            assert!((n.position.z + s.position.z).abs() < EPSILON);
        }
    }

    #[test]
    fn test_empty_logo_is_an_error() {
        let heights = Grid::filled(0, 0, 0.0);
        let mut ids = PointIds::default();
        assert!(matches!(
            logo_patch(&heights, 1.0, 1.0, 1.0, true, &mut ids),
            Err(MeshError::EmptyHeightField { .. })
        ));
    }
}
