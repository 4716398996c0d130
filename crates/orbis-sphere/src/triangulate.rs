//! "Walking the dog": greedy nearest-neighbour triangulation between two rings.
//!
//! ```text
//!  dog                <- previous row
//!   ^
//!   human -> next     <- current row
//! ```
//!
//! The human steps along the current row one point at a time. At each step
//! the dog, on the previous row, keeps walking forward while that brings it
//! strictly closer to the human, leaving a triangle behind at every step.
//! Then the human moves on, leaving the triangle `human -> next -> dog`.
//! Finally the dog walks back round to its starting point to close the ring.
//!
//! Distances are measured between points projected onto the unit sphere, so
//! elevation differences between rows never distort the pairing.

use glam::DVec3;

use crate::error::MeshError;
use crate::mesh::{Face, Point, Row, invert};

/// Positions of the human (on the current row) and the dog (on the previous row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the dog in the previous row.
    pub previous_index: usize,
    /// Index of the human in the current row.
    pub current_index: usize,
}

/// Let the dog walk towards `human` for as long as each step brings it strictly
/// closer, pushing one face per step. Returns the updated cursor.
fn walk_dog(
    mut cursor: Cursor,
    human: &Point,
    human_unit: DVec3,
    previous: &[Point],
    previous_units: &[DVec3],
    faces: &mut Vec<Face>,
) -> Cursor {
    let mut dist = human_unit.distance_squared(previous_units[cursor.previous_index]);
    loop {
        let walk = (cursor.previous_index + 1) % previous.len();
        let dist_new = human_unit.distance_squared(previous_units[walk]);
        if dist_new >= dist {
            return cursor;
        }
        faces.push(Face::new(
            human.id,
            previous[walk].id,
            previous[cursor.previous_index].id,
        ));
        cursor.previous_index = walk;
        dist = dist_new;
    }
}

/// Stitch two cyclic rows into a closed strip of triangles.
///
/// `previous` is the row nearer the pole the rows are traversed from. A
/// `previous` row of a single point yields a triangle fan around it.
///
/// # Errors
///
/// Returns [`MeshError::EmptyRow`] if either row is empty.
pub fn walk_the_dog(previous: &[Point], current: &[Point]) -> Result<Vec<Face>, MeshError> {
    if previous.is_empty() || current.is_empty() {
        return Err(MeshError::EmptyRow);
    }

    let previous_units: Vec<DVec3> = previous.iter().map(Point::unit).collect();
    let mut faces = Vec::with_capacity(previous.len() + current.len());
    let mut cursor = Cursor::default();

    for (i, human) in current.iter().enumerate() {
        cursor.current_index = i;
        cursor = walk_dog(
            cursor,
            human,
            human.unit(),
            previous,
            &previous_units,
            &mut faces,
        );
        let next = &current[(i + 1) % current.len()];
        faces.push(Face::new(
            human.id,
            next.id,
            previous[cursor.previous_index].id,
        ));
    }

    // Close the ring: bring the dog back to where it started.
    while cursor.previous_index != 0 {
        let walk = (cursor.previous_index + 1) % previous.len();
        faces.push(Face::new(
            current[0].id,
            previous[walk].id,
            previous[cursor.previous_index].id,
        ));
        cursor.previous_index = walk;
    }

    Ok(faces)
}

/// Stitch `previous` to `current`, keeping the outward orientation even when
/// `current` is a single pole point.
///
/// A one-point `current` would make the human's closing triangle degenerate,
/// so the roles are swapped (the pole becomes a fan centre) and the result is
/// inverted, which yields the same orientation as the regular walk.
pub fn stitch_rows(previous: &[Point], current: &[Point]) -> Result<Vec<Face>, MeshError> {
    if current.len() == 1 && previous.len() > 1 {
        Ok(invert(walk_the_dog(current, previous)?))
    } else {
        walk_the_dog(previous, current)
    }
}

/// Faces joining every consecutive pair of rows.
pub fn faces_for_rows(rows: &[Row]) -> Result<Vec<Face>, MeshError> {
    let mut faces = Vec::new();
    for pair in rows.windows(2) {
        faces.extend(stitch_rows(&pair[0], &pair[1])?);
    }
    Ok(faces)
}
