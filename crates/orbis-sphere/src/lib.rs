//! Spherical mesh generation: turns a raster height field into a closed,
//! point-id-addressed triangle mesh laid out on a sphere.
//!
//! Rows of points are produced per region (map body, polar caps or logos,
//! inner shell), stitched together with the "walking the dog" triangulator,
//! and sequenced by the patch assembler.

mod assemble;
mod boundary;
mod cap;
mod error;
mod field;
mod logo;
mod map;
mod mesh;
mod modulator;
mod projection;
mod sampler;
mod triangulate;
mod winding;

pub use assemble::{
    Caps, LogoSettings, Logos, MeshSettings, Stage, build_mesh, mesh_from_rows, paint_mesh,
};
pub use boundary::{BOUNDARY_EPSILON, Extreme, points_at_extreme};
pub use cap::{MIN_RING_POINTS, MIN_RINGS, RING_DENSITY, cap_patch, cap_rows, shell_patch, sphere_rows};
pub use error::MeshError;
pub use field::{ColorField, Grid, HeightField};
pub use logo::{logo_patch, logo_rows};
pub use map::{RasterSampling, Sample, map_patch, map_rows, paint_patch, paint_rows};
pub use mesh::{Face, Mesh, Patch, Point, PointId, PointIds, Row, invert, spherical_to_cartesian};
pub use modulator::{FLAT_EPSILON, Meridian, Overlays, QuadraticProfile, RadiusMap, wrap_angle};
pub use projection::{Projection, ProjectionKind};
pub use sampler::Sampler;
pub use triangulate::{Cursor, faces_for_rows, stitch_rows, walk_the_dog};
pub use winding::{MeshReport, edge_counts, inspect, triangle_winds_outward, watertight_defects};
