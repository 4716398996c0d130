//! Mesh data model: points, rows, faces, patches, and the point-id allocator.
//!
//! Spherical convention used throughout the crate:
//!
//! ```text
//! x = r * cos(theta) * cos(phi)
//! y = r * sin(theta) * cos(phi)
//! z = r * sin(phi)
//! ```
//!
//! where `theta` is the longitude and `phi` the latitude.

use glam::DVec3;

/// Global point identifier. Dense and strictly increasing over a mesh.
pub type PointId = u64;

/// A mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Global id, assigned once by [`PointIds`].
    pub id: PointId,
    /// Cartesian position.
    pub position: DVec3,
    /// RGBA color, only set by the painting pipeline.
    pub color: Option<[u8; 4]>,
}

impl Point {
    /// Create an uncolored point.
    pub fn new(id: PointId, position: DVec3) -> Self {
        Self {
            id,
            position,
            color: None,
        }
    }

    /// Create a point from spherical coordinates.
    pub fn spherical(id: PointId, r: f64, theta: f64, phi: f64) -> Self {
        Self::new(id, spherical_to_cartesian(r, theta, phi))
    }

    /// Attach an RGBA color.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = Some(color);
        self
    }

    /// Direction of the point on the unit sphere.
    #[inline]
    pub fn unit(&self) -> DVec3 {
        self.position.normalize_or_zero()
    }

    /// Longitude of the point, `atan2(y, x)`.
    #[inline]
    pub fn azimuth(&self) -> f64 {
        self.position.y.atan2(self.position.x)
    }
}

/// Cartesian position of `(r, theta, phi)`.
#[inline]
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> DVec3 {
    let (s_theta, c_theta) = theta.sin_cos();
    let (s_phi, c_phi) = phi.sin_cos();
    DVec3::new(r * c_theta * c_phi, r * s_theta * c_phi, r * s_phi)
}

/// One latitude ring of points, treated as cyclic.
pub type Row = Vec<Point>;

/// A triangle as an ordered triple of point ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Face(pub [PointId; 3]);

impl Face {
    /// Create a face from three ids.
    #[inline]
    pub fn new(a: PointId, b: PointId, c: PointId) -> Self {
        Self([a, b, c])
    }

    /// The three ids in order.
    #[inline]
    pub fn ids(&self) -> [PointId; 3] {
        self.0
    }

    /// The same triangle with opposite orientation (second and third ids swapped).
    #[inline]
    #[must_use]
    pub fn inverted(self) -> Self {
        let [a, b, c] = self.0;
        Self([a, c, b])
    }
}

/// Flip the orientation of every face.
pub fn invert(faces: Vec<Face>) -> Vec<Face> {
    faces.into_iter().map(Face::inverted).collect()
}

/// A contiguous region of the mesh: rows of points plus the faces among them.
///
/// A patch with no rows is a stitch patch; its faces connect the boundaries
/// of two neighbouring patches and it contributes no vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    /// Rows ordered by monotonic latitude.
    pub rows: Vec<Row>,
    /// Faces referencing points of this patch (or of neighbours, for stitches).
    pub faces: Vec<Face>,
}

impl Patch {
    /// Create a patch from rows and faces.
    pub fn new(rows: Vec<Row>, faces: Vec<Face>) -> Self {
        Self { rows, faces }
    }

    /// A zero-vertex patch carrying only stitching faces.
    pub fn stitch(faces: Vec<Face>) -> Self {
        Self {
            rows: Vec::new(),
            faces,
        }
    }

    /// `true` if this patch holds no rows.
    pub fn is_stitch(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of points over all rows.
    pub fn point_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Iterate over all points, row by row.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.rows.iter().flatten()
    }

    /// First row, if any.
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Last row, if any.
    pub fn last_row(&self) -> Option<&Row> {
        self.rows.last()
    }

    /// Id of the last point of the last row.
    pub fn last_id(&self) -> Option<PointId> {
        self.rows.iter().rev().find_map(|row| row.last()).map(|p| p.id)
    }
}

/// An ordered sequence of patches forming one point-id-addressed surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    patches: Vec<Patch>,
}

impl Mesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a patch.
    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// All patches in order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Consume the mesh, returning its patches.
    pub fn into_patches(self) -> Vec<Patch> {
        self.patches
    }

    /// Id of the most recently allocated point, if any.
    pub fn last_id(&self) -> Option<PointId> {
        self.patches.iter().rev().find_map(Patch::last_id)
    }

    /// Global vertex count: `last_id + 1`, or 0 for a mesh without points.
    pub fn vertex_count(&self) -> u64 {
        self.last_id().map_or(0, |id| id + 1)
    }

    /// Sum of all patches' face counts.
    pub fn face_count(&self) -> usize {
        self.patches.iter().map(|p| p.faces.len()).sum()
    }

    /// All points in allocation order.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.patches.iter().flat_map(Patch::points)
    }

    /// All faces in emission order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.patches.iter().flat_map(|p| p.faces.iter())
    }

    /// `true` if any point carries a color.
    pub fn has_colors(&self) -> bool {
        self.points().any(|p| p.color.is_some())
    }
}

/// Monotonic point-id allocator threaded explicitly through every stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointIds {
    next: PointId,
}

impl PointIds {
    /// Allocator whose first id is `first`.
    pub fn starting_at(first: PointId) -> Self {
        Self { next: first }
    }

    /// Allocator continuing after the last point of `mesh` (0 if it has none).
    pub fn after(mesh: &Mesh) -> Self {
        Self {
            next: mesh.vertex_count(),
        }
    }

    /// Hand out the next id.
    #[inline]
    pub fn allocate(&mut self) -> PointId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    #[inline]
    pub fn peek(&self) -> PointId {
        self.next
    }

    /// Give back the `count` most recently allocated ids.
    ///
    /// Only valid for ids that were never emitted into a patch.
    pub fn rollback(&mut self, count: usize) {
        debug_assert!(count as u64 <= self.next, "rollback past id 0");
        self.next -= count as u64;
    }
}
