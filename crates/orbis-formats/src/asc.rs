//! ASC point clouds: one `x y z` line per point.
//!
//! Row grouping is not stored. [`recover_rows`] re-derives it from the
//! angular deltas between consecutive points, which is lossy: rows that
//! happen to share a latitude are merged.

use std::f64::consts::{PI, TAU};
use std::io::{BufRead, Write};

use glam::DVec3;
use orbis_sphere::{Mesh, Point, Row};

use crate::error::FormatError;
use crate::number::format_g;

/// Points inspected when deciding which angle varies along a row.
const FAST_ANGLE_SAMPLES: usize = 10;

/// Write every point of `mesh`, in allocation order.
pub fn write_asc<W: Write>(out: &mut W, mesh: &Mesh) -> Result<(), FormatError> {
    for point in mesh.points() {
        let p = point.position;
        writeln!(out, "{} {} {}", format_g(p.x), format_g(p.y), format_g(p.z))?;
    }
    Ok(())
}

/// Read the points of an ASC file. Blank lines are skipped and columns past
/// the third ignored.
pub fn read_asc<R: BufRead>(input: R) -> Result<Vec<DVec3>, FormatError> {
    let mut points = Vec::new();
    for (k, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut coords = [0.0; 3];
        let mut fields = line.split_whitespace();
        for (axis, c) in coords.iter_mut().enumerate() {
            let field = fields.next().ok_or_else(|| FormatError::Parse {
                line: k + 1,
                message: format!("expected 3 coordinates, found {axis}"),
            })?;
            *c = field.parse().map_err(|e| FormatError::Parse {
                line: k + 1,
                message: format!("bad coordinate {field:?}: {e}"),
            })?;
        }
        points.push(DVec3::from_array(coords));
    }
    Ok(points)
}

/// The angle that changes most between consecutive points of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastAngle {
    /// Rows are latitude rings.
    Theta,
    /// Rows are meridian strips.
    Phi,
}

/// Decide which angle varies along rows by summing deltas over the first points.
pub fn find_fast_angle(points: &[DVec3]) -> FastAngle {
    let angles: Vec<(f64, f64)> = points
        .iter()
        .take(FAST_ANGLE_SAMPLES + 1)
        .map(|&p| angles(p))
        .collect();
    let (d_theta, d_phi) = angles.windows(2).fold((0.0, 0.0), |(t, f), w| {
        (
            t + wrap(w[1].0 - w[0].0, TAU).abs(),
            f + wrap(w[1].1 - w[0].1, PI).abs(),
        )
    });
    if d_theta > d_phi {
        FastAngle::Theta
    } else {
        FastAngle::Phi
    }
}

/// Group `points` into rows with ids `0..n`.
///
/// With `row_length > 0` every row has exactly that many points (the last
/// may be shorter). Otherwise a new row starts whenever the slow angle jumps
/// by more than `0.001 * pi / sqrt(n)`.
pub fn recover_rows(points: &[DVec3], row_length: usize) -> Vec<Row> {
    if points.is_empty() {
        return Vec::new();
    }
    let fast = find_fast_angle(points);
    let threshold = 0.001 * PI / (points.len() as f64).sqrt();

    let mut rows = vec![Row::new()];
    let mut last = angles(points[0]);
    for (k, &position) in points.iter().enumerate() {
        let current = angles(position);
        let new_row = k > 0
            && if row_length > 0 {
                k % row_length == 0
            } else {
                let delta = match fast {
                    FastAngle::Theta => wrap(current.1 - last.1, PI),
                    FastAngle::Phi => wrap(current.0 - last.0, TAU),
                };
                delta.abs() > threshold
            };
        if new_row {
            rows.push(Row::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push(Point::new(k as u64, position));
        }
        last = current;
    }
    tracing::debug!(
        points = points.len(),
        rows = rows.len(),
        fast = ?fast,
        "rows recovered"
    );
    rows
}

/// `(theta, phi)` of a point; the origin maps to `(0, 0)`.
fn angles(p: DVec3) -> (f64, f64) {
    let r = p.length();
    let phi = if r > 0.0 { (p.z / r).clamp(-1.0, 1.0).asin() } else { 0.0 };
    (p.y.atan2(p.x), phi)
}

/// Representative of `x` in `[-period/2, period/2)`.
fn wrap(x: f64, period: f64) -> f64 {
    let x0 = x - period * (x / period).floor();
    if x0 < period / 2.0 { x0 } else { x0 - period }
}
