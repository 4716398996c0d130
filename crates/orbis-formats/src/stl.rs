//! Binary STL writer.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 80 | Header (zeros) |
//! | 80 | 4 | Triangle count (`u32` LE) |
//! | 84 | 50 × N | Triangles: normal 3 × `f32` (zero), 3 vertices × 3 × `f32`, `u16` attribute (0) |

use std::io::Write;

use glam::DVec3;
use orbis_sphere::Mesh;

use crate::error::FormatError;

const HEADER_LEN: usize = 80;

/// Write `mesh` as binary STL. Normals are left as zero vectors.
///
/// `invert` flips every face's orientation on the way out.
pub fn write_stl<W: Write>(out: &mut W, mesh: &Mesh, invert: bool) -> Result<(), FormatError> {
    let mut positions = vec![None; mesh.vertex_count() as usize];
    for point in mesh.points() {
        if let Some(slot) = positions.get_mut(point.id as usize) {
            *slot = Some(point.position);
        }
    }
    let lookup = |id: u64| -> Result<DVec3, FormatError> {
        positions
            .get(id as usize)
            .copied()
            .flatten()
            .ok_or(FormatError::MissingPoint(id))
    };

    out.write_all(&[0u8; HEADER_LEN])?;
    out.write_all(&(mesh.face_count() as u32).to_le_bytes())?;
    for face in mesh.faces() {
        let face = if invert { face.inverted() } else { *face };
        for _ in 0..3 {
            out.write_all(&0f32.to_le_bytes())?;
        }
        for id in face.ids() {
            let p = lookup(id)?;
            for c in [p.x, p.y, p.z] {
                out.write_all(&(c as f32).to_le_bytes())?;
            }
        }
        out.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use orbis_sphere::{Face, Patch, Point};

    use super::*;

    fn mesh(faces: Vec<Face>) -> Mesh {
        let row = [DVec3::X, DVec3::Y, DVec3::Z]
            .iter()
            .enumerate()
            .map(|(i, &p)| Point::new(i as u64, p))
            .collect();
        let mut mesh = Mesh::new();
        mesh.push(Patch::new(vec![row], faces));
        mesh
    }

    fn vertex(bytes: &[u8], triangle: usize, corner: usize) -> [f32; 3] {
        let base = 84 + 50 * triangle + 12 + 12 * corner;
        [0, 4, 8].map(|o| f32::from_le_bytes(bytes[base + o..base + o + 4].try_into().unwrap()))
    }

    #[test]
    fn test_layout() {
        let mut out = Vec::new();
        write_stl(&mut out, &mesh(vec![Face::new(0, 1, 2), Face::new(2, 1, 0)]), false).unwrap();
        assert_eq!(out.len(), 84 + 2 * 50);
        assert!(out[..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes(out[80..84].try_into().unwrap()), 2);
        assert!(out[84..96].iter().all(|&b| b == 0));
        assert_eq!(vertex(&out, 0, 1), [0.0, 1.0, 0.0]);
        assert_eq!(vertex(&out, 1, 0), [0.0, 0.0, 1.0]);
        assert_eq!(&out[84 + 48..84 + 50], &[0, 0]);
    }

    #[test]
    fn test_invert_reorders_vertices() {
        let mut out = Vec::new();
        write_stl(&mut out, &mesh(vec![Face::new(0, 1, 2)]), true).unwrap();
        assert_eq!(vertex(&out, 0, 1), [0.0, 0.0, 1.0]);
        assert_eq!(vertex(&out, 0, 2), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_point_is_an_error() {
        let mut out = Vec::new();
        let err = write_stl(&mut out, &mesh(vec![Face::new(0, 1, 7)]), false).unwrap_err();
        assert!(matches!(err, FormatError::MissingPoint(7)));
    }
}
