//! PLY writer (binary little-endian or ASCII), with optional vertex colors.
//!
//! ## Layout
//!
//! | Section | Binary | ASCII |
//! |---------|--------|-------|
//! | Header | text, ends with `end_header\n` | same |
//! | Vertex | 3 × `f32` LE (+ 4 × `u8` RGBA) | `%g %g %g` (+ ` r g b a`) |
//! | Face | `u8` 3, then 3 × `i32` LE | `3 i j k` |

use std::io::Write;

use orbis_sphere::{Face, Mesh};

use crate::error::FormatError;
use crate::number::format_g;

/// Color given to uncolored points of a colored mesh.
const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// PLY header for the given counts.
pub fn ply_header(vertices: u64, faces: usize, binary: bool, colors: bool) -> String {
    let format = if binary { "binary_little_endian" } else { "ascii" };
    let mut header = format!(
        "ply\nformat {format} 1.0\ncomment made by orbis\nelement vertex {vertices}\n\
         property float x\nproperty float y\nproperty float z\n"
    );
    if colors {
        header.push_str(
            "property uchar red\nproperty uchar green\nproperty uchar blue\nproperty uchar alpha\n",
        );
    }
    header.push_str(&format!(
        "element face {faces}\nproperty list uchar int vertex_index\nend_header\n"
    ));
    header
}

/// Write `mesh` as PLY. Vertex colors are written if any point carries one.
///
/// `invert` flips every face's orientation on the way out.
pub fn write_ply<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    binary: bool,
    invert: bool,
) -> Result<(), FormatError> {
    let vertices = mesh.vertex_count();
    if vertices > i32::MAX as u64 {
        return Err(FormatError::TooManyVertices(vertices));
    }
    let colors = mesh.has_colors();
    out.write_all(ply_header(vertices, mesh.face_count(), binary, colors).as_bytes())?;

    for point in mesh.points() {
        let p = point.position;
        let color = point.color.unwrap_or(DEFAULT_COLOR);
        if binary {
            for c in [p.x, p.y, p.z] {
                out.write_all(&(c as f32).to_le_bytes())?;
            }
            if colors {
                out.write_all(&color)?;
            }
        } else {
            write!(out, "{} {} {}", format_g(p.x), format_g(p.y), format_g(p.z))?;
            if colors {
                let [r, g, b, a] = color;
                write!(out, " {r} {g} {b} {a}")?;
            }
            out.write_all(b"\n")?;
        }
    }

    for face in mesh.faces() {
        let face = if invert { face.inverted() } else { *face };
        write_face(out, face, binary)?;
    }
    Ok(())
}

fn write_face<W: Write>(out: &mut W, face: Face, binary: bool) -> Result<(), FormatError> {
    // Ids were checked against the vertex count, which fits in an i32.
    let [a, b, c] = face.ids().map(|id| id as i32);
    if binary {
        out.write_all(&[3])?;
        for id in [a, b, c] {
            out.write_all(&id.to_le_bytes())?;
        }
    } else {
        writeln!(out, "3 {a} {b} {c}")?;
    }
    Ok(())
}
