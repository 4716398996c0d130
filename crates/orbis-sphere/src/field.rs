//! Row-major raster grids: height fields and color fields.

use crate::error::MeshError;

/// A dense row-major raster. `(i, j)` is column `i` of row `j`, with row 0 at
/// the top of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Scalar elevations, one per raster cell.
pub type HeightField = Grid<f64>;

/// RGBA pixels, one per raster cell.
pub type ColorField = Grid<[u8; 4]>;

impl<T: Copy> Grid<T> {
    /// Wrap a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::FieldSizeMismatch`] if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<T>) -> Result<Self, MeshError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(MeshError::FieldSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(i, j)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for j in 0..height {
            for i in 0..width {
                data.push(f(i, j));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `true` if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at column `i`, row `j`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the grid.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.width && j < self.height, "cell ({i}, {j}) out of bounds");
        self.data[j * self.width + i]
    }

    /// Row `j` as a slice.
    pub fn row(&self, j: usize) -> &[T] {
        &self.data[j * self.width..(j + 1) * self.width]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every cell, keeping the dimensions.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<(), MeshError> {
        if self.is_empty() {
            Err(MeshError::EmptyHeightField {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(())
        }
    }
}

impl HeightField {
    /// Minimum and maximum cell value, or `None` for an empty field.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut cells = self.data.iter().copied();
        let first = cells.next()?;
        Some(cells.fold((first, first), |(lo, hi), h| (lo.min(h), hi.max(h))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Grid::new(3, 2, vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            MeshError::FieldSizeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(3, 2, |i, j| (i + 10 * j) as f64);
        assert_eq!(grid.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(grid.get(2, 0), 2.0);
    }

    #[test]
    fn test_range() {
        let grid = Grid::from_fn(4, 4, |i, j| i as f64 - j as f64);
        assert_eq!(grid.range(), Some((-3.0, 3.0)));
        let empty: HeightField = Grid::filled(0, 0, 0.0);
        assert_eq!(empty.range(), None);
        assert!(empty.ensure_not_empty().is_err());
    }

    #[test]
    fn test_map_keeps_dimensions() {
        let grid = Grid::filled(5, 3, 2.0).map(|h| -h);
        assert_eq!((grid.width(), grid.height()), (5, 3));
        assert!(grid.cells().iter().all(|&h| h == -2.0));
    }
}
