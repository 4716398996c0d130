//! Winding and closure checks for assembled meshes.
//!
//! A sphere-topology mesh is closed when every undirected edge is shared by
//! exactly two triangles, and correctly oriented when triangle normals point
//! away from the centre.

use glam::DVec3;
use rustc_hash::FxHashMap;

use crate::mesh::{Face, Mesh, PointId};

/// Check if a triangle has outward-facing winding order.
///
/// Returns `true` if the triangle's normal (via cross product) points away
/// from the origin, i.e. has a positive dot product with the centroid.
pub fn triangle_winds_outward(v0: DVec3, v1: DVec3, v2: DVec3) -> bool {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let face_normal = edge1.cross(edge2);

    let centroid = (v0 + v1 + v2) / 3.0;

    face_normal.dot(centroid) > 0.0
}

/// Number of triangles using each undirected edge.
pub fn edge_counts(faces: &[Face]) -> FxHashMap<(PointId, PointId), u32> {
    let mut counts = FxHashMap::default();
    for face in faces {
        let [a, b, c] = face.ids();
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *counts.entry((u.min(v), u.max(v))).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of edges not shared by exactly two triangles.
pub fn watertight_defects(faces: &[Face]) -> usize {
    edge_counts(faces).values().filter(|&&n| n != 2).count()
}

/// Closure and orientation summary of a mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshReport {
    /// Global vertex count.
    pub vertices: u64,
    /// Total faces.
    pub faces: usize,
    /// Edges used by a single triangle.
    pub open_edges: usize,
    /// Edges used by three or more triangles.
    pub overshared_edges: usize,
    /// Faces whose normal points outwards.
    pub outward_faces: usize,
}

impl MeshReport {
    /// `true` if every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        self.open_edges == 0 && self.overshared_edges == 0
    }
}

/// Inspect closure and orientation of `mesh`.
pub fn inspect(mesh: &Mesh) -> MeshReport {
    let faces: Vec<Face> = mesh.faces().copied().collect();

    let mut positions = vec![DVec3::ZERO; mesh.vertex_count() as usize];
    for point in mesh.points() {
        positions[point.id as usize] = point.position;
    }

    let counts = edge_counts(&faces);
    let outward_faces = faces
        .iter()
        .filter(|f| {
            let [a, b, c] = f.ids().map(|id| positions[id as usize]);
            triangle_winds_outward(a, b, c)
        })
        .count();

    MeshReport {
        vertices: mesh.vertex_count(),
        faces: faces.len(),
        open_edges: counts.values().filter(|&&n| n == 1).count(),
        overshared_edges: counts.values().filter(|&&n| n > 2).count(),
        outward_faces,
    }
}
