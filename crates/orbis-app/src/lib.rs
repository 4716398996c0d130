//! Command-line front ends for the orbis mesher.
//!
//! Every run validates its inputs, builds the complete mesh in memory and only
//! then creates the output file, so a failed run leaves nothing behind.

pub mod error;
pub mod pipeline;
pub mod platform;

pub use error::AppError;
pub use pipeline::{
    PaintOptions, build_map_mesh, ensure_input, ensure_writable, load_logos, output_path,
    run_map, run_paint, run_poly,
};
pub use platform::AppDirs;
