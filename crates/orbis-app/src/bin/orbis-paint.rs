//! The `orbis-paint` binary: paint a map's colors over a unit sphere.

use std::path::PathBuf;

use clap::Parser;
use orbis_app::{PaintOptions, run_paint};
use orbis_config::Config;
use orbis_sphere::ProjectionKind;

/// Paint with colors over the surface of a sphere an image with a map.
#[derive(Parser, Debug)]
#[command(name = "orbis-paint", version)]
struct PaintArgs {
    /// Image file with the map.
    image: PathBuf,

    /// Output file (derived from the image name if absent).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not check whether the output file already exists.
    #[arg(long)]
    overwrite: bool,

    /// Projection used in the map.
    #[arg(long, default_value_t = ProjectionKind::Mercator)]
    projection: ProjectionKind,

    /// Maximum number of points (0 = every pixel).
    #[arg(long, default_value_t = 0)]
    points: usize,

    /// Do not fix the aspect ratio for projections that expect one.
    #[arg(long)]
    no_ratio_check: bool,

    /// Try to fill dark gaps in the map.
    #[arg(long)]
    fill_gaps: bool,

    /// Write text PLY instead of binary.
    #[arg(long)]
    ascii: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = PaintArgs::parse();

    let mut config = Config::default();
    config.debug.log_level = args.log_level.clone();
    orbis_log::init_logging(None, false, Some(&config));

    let options = PaintOptions {
        projection: args.projection,
        points: args.points,
        fix_ratio: !args.no_ratio_check,
        fill_gaps: args.fill_gaps,
        ascii: args.ascii,
        overwrite: args.overwrite,
    };
    match run_paint(&args.image, args.output.as_deref(), &options) {
        Ok(output) => println!("The output is in file {}", output.display()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
