//! The `orbis` binary: map image to sphere mesh.

use clap::Parser;
use orbis_app::{AppDirs, AppError, run_map};
use orbis_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(output) => println!("The output is in file {}", output.display()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(args: &CliArgs) -> Result<std::path::PathBuf, AppError> {
    let dirs = match &args.config {
        Some(dir) => AppDirs::from_config_dir(dir),
        None => AppDirs::resolve()?,
    };
    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);

    orbis_log::init_logging(Some(&dirs.log_dir), config.debug.json_log, Some(&config));
    tracing::debug!(config_dir = %dirs.config_dir.display(), "configuration loaded");

    run_map(&args.image, args.output.as_deref(), &config)
}
