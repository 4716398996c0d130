//! Height-to-radius mapping and decorative overlays (meridians, equator).

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::field::HeightField;

/// Height ranges at or below this are treated as flat.
pub const FLAT_EPSILON: f64 = 1e-6;

/// Maps raw heights to radii in `[1 - scale, 1 + scale]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusMap {
    hmin: f64,
    hmax: f64,
    scale: f64,
    flat: bool,
}

impl RadiusMap {
    /// Build the mapping from the range of `heights`.
    ///
    /// A range no larger than `epsilon` yields a flat unit sphere.
    pub fn new(heights: &HeightField, scale: f64, epsilon: f64) -> Self {
        let (hmin, hmax) = heights.range().unwrap_or((0.0, 0.0));
        Self::from_range(hmin, hmax, scale, epsilon)
    }

    /// Build the mapping from an explicit height range.
    pub fn from_range(hmin: f64, hmax: f64, scale: f64, epsilon: f64) -> Self {
        Self {
            hmin,
            hmax,
            scale,
            flat: hmax - hmin <= epsilon,
        }
    }

    /// `true` if the height range was degenerate.
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// Radius for height `h`.
    #[inline]
    pub fn radius(&self, h: f64) -> f64 {
        if self.flat {
            1.0
        } else {
            1.0 + self.scale * (2.0 * (h - self.hmin) / (self.hmax - self.hmin) - 1.0)
        }
    }
}

/// A raised meridian line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meridian {
    /// Longitude in radians.
    pub position: f64,
    /// Full angular width in radians.
    pub width: f64,
}

impl Meridian {
    /// Meridian from degrees.
    pub fn from_degrees(position_deg: f64, width_deg: f64) -> Self {
        Self {
            position: position_deg.to_radians(),
            width: width_deg.to_radians(),
        }
    }
}

/// `f(x) = y0 + a * (x - x0)^2`, passing through two given points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticProfile {
    x0: f64,
    y0: f64,
    a: f64,
}

impl QuadraticProfile {
    /// Profile with its vertex at `(x0, y0)` that also passes through `(x1, y1)`.
    pub fn through((x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> Self {
        let dx = x1 - x0;
        let a = if dx == 0.0 { 0.0 } else { (y1 - y0) / (dx * dx) };
        Self { x0, y0, a }
    }

    /// Evaluate at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let d = x - self.x0;
        self.y0 + self.a * d * d
    }
}

/// Overlay configuration resolved for one map.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlays {
    meridians: Vec<Meridian>,
    meridian_profile: QuadraticProfile,
    equator_width: f64,
    equator_height: f64,
    enabled: bool,
}

impl Overlays {
    /// Overlays whose meridian height runs from `meridians_height` at the
    /// equator to `caps_height` at latitude `phi_cap`.
    pub fn new(
        meridians: Vec<Meridian>,
        meridians_height: f64,
        caps_height: f64,
        phi_cap: f64,
        equator_width: f64,
        equator_height: f64,
    ) -> Self {
        Self {
            meridians,
            meridian_profile: QuadraticProfile::through(
                (0.0, meridians_height),
                (phi_cap, caps_height),
            ),
            equator_width,
            equator_height,
            enabled: true,
        }
    }

    /// No overlays at all.
    pub fn none() -> Self {
        Self {
            meridians: Vec::new(),
            meridian_profile: QuadraticProfile::through((0.0, 1.0), (1.0, 1.0)),
            equator_width: 0.0,
            equator_height: 1.0,
            enabled: false,
        }
    }

    /// Switch every overlay off (used for degenerate height fields).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// `true` if any overlay can apply.
    pub fn is_enabled(&self) -> bool {
        self.enabled && (self.equator_width > 0.0 || !self.meridians.is_empty())
    }

    /// `true` if `theta` lies on any meridian. Widths are floored at half the
    /// sampling stride so thin meridians stay visible.
    pub fn on_meridian(&self, theta: f64, stride_angle: f64) -> bool {
        self.meridians.iter().any(|m| {
            let dist = wrap_angle(theta - m.position).abs();
            dist <= (m.width / 2.0).max(stride_angle / 2.0)
        })
    }

    /// Overlay radius at `(theta, phi)`, or `None` when the terrain shows through.
    ///
    /// The equatorial band wins over meridians.
    pub fn radius_at(&self, theta: f64, phi: f64, stride_angle: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        if self.equator_width > 0.0 && phi.abs() < self.equator_width / 2.0 {
            Some(self.equator_height)
        } else if self.on_meridian(theta, stride_angle) {
            Some(self.meridian_profile.eval(phi.abs()))
        } else {
            None
        }
    }
}

/// Representative of `a` in `[-pi, pi)`.
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    let a0 = a - TAU * (a / TAU).floor();
    if a0 < PI { a0 } else { a0 - TAU }
}
