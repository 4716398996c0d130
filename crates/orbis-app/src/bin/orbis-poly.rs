//! The `orbis-poly` binary: triangulate an ASC point cloud.

use std::path::PathBuf;

use clap::Parser;
use orbis_app::run_poly;
use orbis_config::Config;
use orbis_formats::{OutputFormat, WriteOptions};

/// Read a file with points on a sphere, one per line, and write the
/// polygons that join them.
///
/// Rows are not stored in ASC files, so they are guessed from the angles
/// between consecutive points unless `--row-length` is given.
#[derive(Parser, Debug)]
#[command(name = "orbis-poly", version)]
struct PolyArgs {
    /// ASC file with the points.
    input: PathBuf,

    /// Output file (derived from the input name if absent).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (ply or stl).
    #[arg(long = "type", default_value_t = OutputFormat::Ply)]
    format: OutputFormat,

    /// Points per row (0 = detect rows from the angles).
    #[arg(long, default_value_t = 0)]
    row_length: usize,

    /// Write text PLY instead of binary.
    #[arg(long)]
    ascii: bool,

    /// Flip the orientation of every face.
    #[arg(long)]
    invert_faces: bool,

    /// Do not check whether the output file already exists.
    #[arg(long)]
    overwrite: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = PolyArgs::parse();

    let mut config = Config::default();
    config.debug.log_level = args.log_level.clone();
    orbis_log::init_logging(None, false, Some(&config));

    let options = WriteOptions {
        ascii: args.ascii,
        invert: args.invert_faces,
    };
    let result = run_poly(
        &args.input,
        args.output.as_deref(),
        args.format,
        args.row_length,
        options,
        args.overwrite,
    );
    match result {
        Ok(output) => println!("The output is in file {}", output.display()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
