//! Adaptive raster sampling: row and column strides from a point budget.

/// Row/column strides for a raster given a point budget.
///
/// With a budget of `npoints`, `n = sqrt(npoints)`. Rows are taken every
/// `max(1, ny / (3n))` raster rows; the factor 3 compensates for the
/// `1 / cos(phi)` dilation applied to columns. A budget of 0 samples every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    n: f64,
    width: usize,
    height: usize,
    equal_area: bool,
}

impl Sampler {
    /// Sampler for a `width x height` raster.
    pub fn new(npoints: usize, width: usize, height: usize, equal_area: bool) -> Self {
        Self {
            n: (npoints as f64).sqrt(),
            width,
            height,
            equal_area,
        }
    }

    /// `true` when every raster cell is sampled.
    pub fn is_dense(&self) -> bool {
        self.n == 0.0
    }

    /// Vertical stride in raster rows.
    pub fn step_y(&self) -> usize {
        if self.is_dense() {
            return 1;
        }
        (self.height as f64 / (3.0 * self.n)).max(1.0) as usize
    }

    /// Horizontal stride in raster columns for a row at latitude `phi`.
    ///
    /// Non-equal-area projections stretch the stride by `1 / cos(phi)` so that
    /// points stay roughly evenly spaced in physical angle near the poles.
    pub fn step_x(&self, phi: f64) -> usize {
        if self.is_dense() {
            return 1;
        }
        let dilation = if self.equal_area { 1.0 } else { 1.0 / phi.cos() };
        // `as` saturates, so the stride at a pole collapses the row to one column.
        (((self.width as f64 / self.n).max(1.0) * dilation) as usize).max(1)
    }

    /// Angular width of a horizontal stride at latitude `phi`, in radians.
    pub fn stride_angle(&self, phi: f64) -> f64 {
        2.0 * std::f64::consts::PI * self.step_x(phi) as f64 / self.width as f64
    }

    /// Raster row indices to visit, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        (0..self.height).step_by(self.step_y())
    }

    /// Raster column indices to visit for a row at latitude `phi`.
    pub fn columns(&self, phi: f64) -> impl Iterator<Item = usize> {
        (0..self.width).step_by(self.step_x(phi))
    }
}
