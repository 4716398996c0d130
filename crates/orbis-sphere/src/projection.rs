//! Inverse cartographic projections: raster coordinates to longitude/latitude.
//!
//! Raster coordinates are recentred so the image centre is the origin, with
//! `x` growing to the right and `y` growing upwards. The sphere radius is
//! reconstructed from the raster width so the longitude range spans the whole
//! image.
//!
//! A `NaN` result means the cell lies outside the projection's valid domain;
//! callers must skip such samples.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Keeps Mollweide border columns from landing exactly on `theta = ±pi`.
const MOLLWEIDE_EPSILON: f64 = 1e-8;

/// Supported map projections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    /// `y = r * ln(tan(pi/4 + phi/2))`.
    #[default]
    Mercator,
    /// `y = r * tan(phi)`.
    CentralCylindrical,
    /// `y = r * phi`.
    Equirectangular,
    /// `x = r * theta * cos(phi)`, `y = r * phi`.
    Sinusoidal,
    /// Equal-area ellipse.
    Mollweide,
    /// Azimuthal disk of the northern hemisphere, pole at the centre.
    HalfSphere,
}

impl ProjectionKind {
    /// Every projection, in declaration order.
    pub const ALL: [ProjectionKind; 6] = [
        Self::Mercator,
        Self::CentralCylindrical,
        Self::Equirectangular,
        Self::Sinusoidal,
        Self::Mollweide,
        Self::HalfSphere,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mercator => "mercator",
            Self::CentralCylindrical => "central-cylindrical",
            Self::Equirectangular => "equirectangular",
            Self::Sinusoidal => "sinusoidal",
            Self::Mollweide => "mollweide",
            Self::HalfSphere => "half-sphere",
        }
    }

    /// Equal-area projections already sample uniformly in physical angle and
    /// need no horizontal dilation near the poles.
    pub fn is_equal_area(self) -> bool {
        matches!(self, Self::Mollweide | Self::Sinusoidal)
    }

    /// Latitude depends on both raster coordinates, so rows are not latitude rings.
    pub fn is_azimuthal(self) -> bool {
        matches!(self, Self::HalfSphere)
    }

    /// Raster height this projection expects for a given width, if it fixes one.
    pub fn expected_height(self, width: usize) -> Option<usize> {
        match self {
            Self::Mollweide => Some((width as f64 * SQRT_2 / PI) as usize),
            Self::Equirectangular | Self::Sinusoidal => Some(width / 2),
            Self::Mercator | Self::CentralCylindrical | Self::HalfSphere => None,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mercator" => Ok(Self::Mercator),
            "central-cylindrical" | "cylindrical" => Ok(Self::CentralCylindrical),
            "equirectangular" => Ok(Self::Equirectangular),
            "sinusoidal" => Ok(Self::Sinusoidal),
            "mollweide" => Ok(Self::Mollweide),
            "half-sphere" => Ok(Self::HalfSphere),
            other => Err(MeshError::UnknownProjection(other.to_string())),
        }
    }
}

/// Inverse projection for one raster size, built once and reused for every sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    width: usize,
    height: usize,
    radius: f64,
}

impl Projection {
    /// Reconstruct the projection radius for a `width x height` raster.
    pub fn new(kind: ProjectionKind, width: usize, height: usize) -> Self {
        let nx = width as f64;
        let radius = match kind {
            ProjectionKind::Mollweide => nx / (4.0 * SQRT_2 - MOLLWEIDE_EPSILON),
            ProjectionKind::HalfSphere => nx / 2.0,
            _ => nx / (2.0 * PI),
        };
        Self {
            kind,
            width,
            height,
            radius,
        }
    }

    /// Projection kind.
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Reconstructed sphere radius in pixels (disk radius for half-sphere).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Raster width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Longitude of the recentred raster point `(x, y)`, or `NaN`.
    pub fn theta(&self, x: f64, y: f64) -> f64 {
        let r = self.radius;
        match self.kind {
            ProjectionKind::Mercator
            | ProjectionKind::CentralCylindrical
            | ProjectionKind::Equirectangular => x / r,
            ProjectionKind::Sinusoidal => within_pi(x / (r * (y / r).cos())),
            ProjectionKind::Mollweide => {
                let Some(aux) = mollweide_aux(y, r) else {
                    return f64::NAN;
                };
                within_pi(PI * x / (2.0 * r * SQRT_2 * aux.cos()))
            }
            ProjectionKind::HalfSphere => {
                if x * x + y * y > r * r {
                    f64::NAN
                } else {
                    y.atan2(x)
                }
            }
        }
    }

    /// Latitude of the recentred raster point `(x, y)`, or `NaN`.
    ///
    /// Only the half-sphere projection uses `x`.
    pub fn phi(&self, x: f64, y: f64) -> f64 {
        let r = self.radius;
        match self.kind {
            ProjectionKind::Mercator => 2.0 * (y / r).exp().atan() - FRAC_PI_2,
            ProjectionKind::CentralCylindrical => y.atan2(r),
            ProjectionKind::Equirectangular | ProjectionKind::Sinusoidal => y / r,
            ProjectionKind::Mollweide => {
                let Some(aux) = mollweide_aux(y, r) else {
                    return f64::NAN;
                };
                let sin_phi = (2.0 * aux + (2.0 * aux).sin()) / PI;
                if -1.0 < sin_phi && sin_phi < 1.0 {
                    sin_phi.asin()
                } else {
                    f64::NAN
                }
            }
            ProjectionKind::HalfSphere => {
                let r2 = x * x + y * y;
                if r2 > r * r {
                    f64::NAN
                } else {
                    FRAC_PI_2 * (1.0 - (r2 / (r * r)).sqrt())
                }
            }
        }
    }

    /// Latitude of the top raster row (`y = height / 2`), where an automatic
    /// cap begins. The half-sphere always reaches the pole.
    pub fn top_latitude(&self) -> f64 {
        match self.kind {
            ProjectionKind::HalfSphere => FRAC_PI_2,
            _ => self.phi(0.0, (self.height / 2) as f64),
        }
    }

    /// Forward projection: recentred raster coordinates of `(theta, phi)`.
    pub fn forward(&self, theta: f64, phi: f64) -> (f64, f64) {
        let r = self.radius;
        match self.kind {
            ProjectionKind::Mercator => (r * theta, r * (FRAC_PI_4 + phi / 2.0).tan().ln()),
            ProjectionKind::CentralCylindrical => (r * theta, r * phi.tan()),
            ProjectionKind::Equirectangular => (r * theta, r * phi),
            ProjectionKind::Sinusoidal => (r * theta * phi.cos(), r * phi),
            ProjectionKind::Mollweide => {
                let aux = mollweide_auxiliary_angle(phi);
                (
                    r * 2.0 * SQRT_2 / PI * theta * aux.cos(),
                    r * SQRT_2 * aux.sin(),
                )
            }
            ProjectionKind::HalfSphere => {
                let rho = r * (1.0 - phi / FRAC_PI_2);
                (rho * theta.cos(), rho * theta.sin())
            }
        }
    }
}

/// `asin(y / (r * sqrt(2)))` when the argument is strictly inside `(-1, 1)`.
fn mollweide_aux(y: f64, r: f64) -> Option<f64> {
    let sin_aux = y / (r * SQRT_2);
    (-1.0 < sin_aux && sin_aux < 1.0).then(|| sin_aux.asin())
}

/// Solve `2a + sin(2a) = pi * sin(phi)` for `a` by Newton iteration.
fn mollweide_auxiliary_angle(phi: f64) -> f64 {
    let target = PI * phi.sin();
    let mut aux = phi;
    for _ in 0..50 {
        let derivative = 2.0 + 2.0 * (2.0 * aux).cos();
        if derivative.abs() < 1e-15 {
            break;
        }
        let step = (2.0 * aux + (2.0 * aux).sin() - target) / derivative;
        aux -= step;
        if step.abs() < 1e-15 {
            break;
        }
    }
    aux
}

#[inline]
fn within_pi(theta: f64) -> f64 {
    if -PI < theta && theta < PI {
        theta
    } else {
        f64::NAN
    }
}
