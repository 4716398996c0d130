//! Parametric latitude rings: polar caps and the hollow inner shell.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::MeshError;
use crate::mesh::{Patch, PointIds, Point, Row, invert};
use crate::triangulate::faces_for_rows;

/// Points per ring at the equator; rings shrink with `cos(phi)`.
pub const RING_DENSITY: f64 = 300.0;
/// Fewest points on any non-polar ring.
pub const MIN_RING_POINTS: usize = 9;
/// Fewest rings on any cap.
pub const MIN_RINGS: usize = 10;
/// Extra rings per radian of latitude covered.
const RINGS_PER_RADIAN: usize = 21;

/// Rings of radius `r` from latitude `phi_start` to `phi_end` (both included).
///
/// A ring lying exactly on a pole collapses to a single point.
pub fn sphere_rows(r: f64, phi_start: f64, phi_end: f64, ids: &mut PointIds) -> Vec<Row> {
    let span = (phi_end - phi_start).abs();
    let nphi = MIN_RINGS.max(RINGS_PER_RADIAN * span as usize);

    (0..nphi)
        .map(|k| {
            let phi = phi_start + (phi_end - phi_start) * k as f64 / (nphi - 1) as f64;
            ring(r, phi, ids)
        })
        .collect()
}

fn ring(r: f64, phi: f64, ids: &mut PointIds) -> Row {
    if (phi.abs() - FRAC_PI_2).abs() < 1e-9 {
        return vec![Point::spherical(ids.allocate(), r, 0.0, phi.signum() * FRAC_PI_2)];
    }
    let count = MIN_RING_POINTS.max((RING_DENSITY * phi.cos()).round() as usize);
    (0..count)
        .map(|k| {
            let theta = -PI + TAU * k as f64 / count as f64;
            Point::spherical(ids.allocate(), r, theta, phi)
        })
        .collect()
}

/// Rings of a polar cap of radius `r` bounded by latitude `phi_cap`.
///
/// A positive `phi_cap` builds the north cap (pole first), a negative one the
/// south cap (pole last), so rows always run north to south.
pub fn cap_rows(r: f64, phi_cap: f64, ids: &mut PointIds) -> Vec<Row> {
    if phi_cap > 0.0 {
        sphere_rows(r, FRAC_PI_2, phi_cap, ids)
    } else {
        sphere_rows(r, phi_cap, -FRAC_PI_2, ids)
    }
}

/// Polar cap patch, triangulated unless `with_faces` is false.
pub fn cap_patch(
    r: f64,
    phi_cap: f64,
    with_faces: bool,
    ids: &mut PointIds,
) -> Result<Patch, MeshError> {
    let rows = cap_rows(r, phi_cap, ids);
    let faces = if with_faces {
        faces_for_rows(&rows)?
    } else {
        Vec::new()
    };
    Ok(Patch::new(rows, faces))
}

/// Inner sphere of radius `1 - thickness`, with faces pointing inwards.
pub fn shell_patch(
    thickness: f64,
    with_faces: bool,
    ids: &mut PointIds,
) -> Result<Patch, MeshError> {
    let rows = sphere_rows(1.0 - thickness, FRAC_PI_2, -FRAC_PI_2, ids);
    let faces = if with_faces {
        invert(faces_for_rows(&rows)?)
    } else {
        Vec::new()
    };
    Ok(Patch::new(rows, faces))
}
