//! Map body: raster cells projected onto the sphere, row by row.

use std::f64::consts::FRAC_PI_2;

use crate::error::MeshError;
use crate::field::{ColorField, HeightField};
use crate::mesh::{Patch, Point, PointId, PointIds, Row};
use crate::modulator::{Overlays, RadiusMap};
use crate::projection::{Projection, ProjectionKind};
use crate::sampler::Sampler;
use crate::triangulate::faces_for_rows;

/// One raster cell that survived projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Raster column.
    pub i: usize,
    /// Raster row, 0 at the top.
    pub j: usize,
    /// Longitude.
    pub theta: f64,
    /// Latitude.
    pub phi: f64,
    /// Angular width of one horizontal sampling stride at this latitude.
    pub stride_angle: f64,
}

/// How a raster is walked: its projection, the strides, and the latitude
/// beyond which rows are left to the caps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterSampling {
    projection: Projection,
    sampler: Sampler,
    phi_limit: f64,
}

impl RasterSampling {
    /// Sampling of a `width x height` raster with a budget of `npoints`
    /// (0 samples every cell).
    pub fn new(kind: ProjectionKind, width: usize, height: usize, npoints: usize) -> Self {
        Self {
            projection: Projection::new(kind, width, height),
            sampler: Sampler::new(npoints, width, height, kind.is_equal_area()),
            phi_limit: FRAC_PI_2,
        }
    }

    /// Skip rows whose latitude magnitude exceeds `phi_limit`.
    #[must_use]
    pub fn with_phi_limit(mut self, phi_limit: f64) -> Self {
        self.phi_limit = phi_limit;
        self
    }

    /// The inverse projection in use.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The stride policy in use.
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Walk the raster top to bottom, building one row per raster row.
    ///
    /// Cells outside the projection domain are skipped, as are empty rows.
    pub fn rows(
        &self,
        ids: &mut PointIds,
        mut point: impl FnMut(PointId, &Sample) -> Point,
    ) -> Vec<Row> {
        let nx_2 = (self.projection.width() / 2) as f64;
        let ny_2 = (self.projection.height() / 2) as f64;
        let azimuthal = self.projection.kind().is_azimuthal();

        let mut rows = Vec::new();
        for j in self.sampler.rows() {
            let y = ny_2 - j as f64;
            // Row latitude; the azimuthal case computes it per cell instead.
            let row_phi = if azimuthal {
                0.0
            } else {
                let phi = self.projection.phi(0.0, y);
                if phi.is_nan() || phi.abs() > self.phi_limit {
                    continue;
                }
                phi
            };
            let stride_angle = self.sampler.stride_angle(row_phi);

            let mut row = Row::new();
            for i in self.sampler.columns(row_phi) {
                let x = i as f64 - nx_2;
                let theta = self.projection.theta(x, y);
                let phi = if azimuthal {
                    self.projection.phi(x, y)
                } else {
                    row_phi
                };
                if theta.is_nan() || phi.is_nan() {
                    continue;
                }
                let sample = Sample {
                    i,
                    j,
                    theta,
                    phi,
                    stride_angle,
                };
                row.push(point(ids.allocate(), &sample));
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        rows
    }
}

/// Rows of the map body: overlays where they apply, terrain radius elsewhere.
pub fn map_rows(
    heights: &HeightField,
    sampling: &RasterSampling,
    radii: &RadiusMap,
    overlays: &Overlays,
    ids: &mut PointIds,
) -> Vec<Row> {
    sampling.rows(ids, |id, s| {
        let r = overlays
            .radius_at(s.theta, s.phi, s.stride_angle)
            .unwrap_or_else(|| radii.radius(heights.get(s.i, s.j)));
        Point::spherical(id, r, s.theta, s.phi)
    })
}

/// Map body patch, triangulated unless `with_faces` is false.
///
/// # Errors
///
/// Returns [`MeshError::EmptyHeightField`] for an empty raster.
pub fn map_patch(
    heights: &HeightField,
    sampling: &RasterSampling,
    radii: &RadiusMap,
    overlays: &Overlays,
    with_faces: bool,
    ids: &mut PointIds,
) -> Result<Patch, MeshError> {
    heights.ensure_not_empty()?;
    let rows = map_rows(heights, sampling, radii, overlays, ids);
    let faces = if with_faces {
        faces_for_rows(&rows)?
    } else {
        Vec::new()
    };
    Ok(Patch::new(rows, faces))
}

/// Rows of a unit sphere carrying the raster's colors.
pub fn paint_rows(colors: &ColorField, sampling: &RasterSampling, ids: &mut PointIds) -> Vec<Row> {
    sampling.rows(ids, |id, s| {
        Point::spherical(id, 1.0, s.theta, s.phi).with_color(colors.get(s.i, s.j))
    })
}

/// Painted unit sphere as a single triangulated patch.
///
/// # Errors
///
/// Returns [`MeshError::EmptyHeightField`] for an empty raster.
pub fn paint_patch(
    colors: &ColorField,
    sampling: &RasterSampling,
    ids: &mut PointIds,
) -> Result<Patch, MeshError> {
    colors.ensure_not_empty()?;
    let rows = paint_rows(colors, sampling, ids);
    let faces = faces_for_rows(&rows)?;
    tracing::debug!(rows = rows.len(), faces = faces.len(), "painted patch");
    Ok(Patch::new(rows, faces))
}
