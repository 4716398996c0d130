//! Command-line argument parsing for the `orbis` mesher.

use std::path::PathBuf;

use clap::Parser;
use orbis_formats::OutputFormat;
use orbis_heights::Channel;
use orbis_sphere::{Caps, ProjectionKind};

use crate::Config;

/// Turn a map image into a closed sphere mesh.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "orbis", version, about = "Turn a map image into a closed sphere mesh")]
pub struct CliArgs {
    /// Image file with the map.
    pub image: PathBuf,

    /// Output file (derived from the image name if absent).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (ply, stl, asc).
    #[arg(long = "type")]
    pub format: Option<OutputFormat>,

    /// Write text PLY instead of binary.
    #[arg(long)]
    pub ascii: bool,

    /// Flip the orientation of every face.
    #[arg(long)]
    pub invert_faces: bool,

    /// Replace the output file if it exists.
    #[arg(long)]
    pub overwrite: bool,

    /// Channel holding the elevation (r, g, b, average, hue, sat, val, color).
    #[arg(long)]
    pub channel: Option<Channel>,

    /// Invert the elevations.
    #[arg(long)]
    pub invert: bool,

    /// Projection used in the map.
    #[arg(long)]
    pub projection: Option<ProjectionKind>,

    /// Maximum number of points (0 = every pixel).
    #[arg(long)]
    pub points: Option<usize>,

    /// Fraction of the radius between the lowest and highest point.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Degrees covered by each polar cap, or `auto` or `none`.
    #[arg(long, value_parser = parse_caps)]
    pub caps: Option<Caps>,

    /// Radius of the caps.
    #[arg(long)]
    pub caps_height: Option<f64>,

    /// Raised meridian as `POSITION,WIDTH` in degrees (repeatable).
    #[arg(long = "meridian", value_parser = parse_meridian, allow_hyphen_values = true)]
    pub meridians: Vec<(f64, f64)>,

    /// Do not raise any meridian.
    #[arg(long, conflicts_with = "meridians")]
    pub no_meridians: bool,

    /// Radius of the meridians at the equator.
    #[arg(long)]
    pub meridians_height: Option<f64>,

    /// Width of the raised equator band in degrees (0 = none).
    #[arg(long)]
    pub equator_width: Option<f64>,

    /// Radius of the equator band.
    #[arg(long)]
    pub equator_height: Option<f64>,

    /// Thickness of the hollow shell (0 = solid).
    #[arg(long)]
    pub thickness: Option<f64>,

    /// Image with the north logo.
    #[arg(long)]
    pub logo_north: Option<PathBuf>,

    /// Image with the south logo.
    #[arg(long)]
    pub logo_south: Option<PathBuf>,

    /// Height multiplier of the north logo.
    #[arg(long)]
    pub logo_north_scale: Option<f64>,

    /// Height multiplier of the south logo.
    #[arg(long)]
    pub logo_south_scale: Option<f64>,

    /// Do not fix the aspect ratio for projections that expect one.
    #[arg(long)]
    pub no_ratio_check: bool,

    /// Try to fill dark gaps in the map.
    #[arg(long)]
    pub fill_gaps: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if args.ascii {
            self.output.ascii = true;
        }
        if args.invert_faces {
            self.output.invert_faces = true;
        }
        if args.overwrite {
            self.output.overwrite = true;
        }
        if let Some(channel) = args.channel {
            self.image.channel = channel;
        }
        if args.invert {
            self.image.invert = true;
        }
        if args.no_ratio_check {
            self.image.fix_ratio = false;
        }
        if args.fill_gaps {
            self.image.fill_gaps = true;
        }

        let mesh = &mut self.mesh;
        if let Some(projection) = args.projection {
            mesh.projection = projection;
        }
        if let Some(points) = args.points {
            mesh.points = points;
        }
        if let Some(scale) = args.scale {
            mesh.scale = scale;
        }
        if let Some(caps) = args.caps {
            mesh.caps = caps;
        }
        if let Some(h) = args.caps_height {
            mesh.caps_height = h;
        }
        if args.no_meridians {
            mesh.meridians.clear();
        } else if !args.meridians.is_empty() {
            mesh.meridians = args.meridians.clone();
        }
        if let Some(h) = args.meridians_height {
            mesh.meridians_height = h;
        }
        if let Some(w) = args.equator_width {
            mesh.equator_width = w;
        }
        if let Some(h) = args.equator_height {
            mesh.equator_height = h;
        }
        if let Some(t) = args.thickness {
            mesh.thickness = t;
        }
        if let Some(ref logo) = args.logo_north {
            mesh.logo_north = Some(logo.clone());
        }
        if let Some(ref logo) = args.logo_south {
            mesh.logo_south = Some(logo.clone());
        }
        if let Some(s) = args.logo_north_scale {
            mesh.logo_north_scale = s;
        }
        if let Some(s) = args.logo_south_scale {
            mesh.logo_south_scale = s;
        }

        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

/// Parse `auto`, `none`, or an angle strictly between 0 and 90 degrees.
pub fn parse_caps(s: &str) -> Result<Caps, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(Caps::Auto),
        "none" => Ok(Caps::None),
        other => {
            let deg: f64 = other
                .parse()
                .map_err(|_| format!("caps must be \"auto\", \"none\" or an angle, got {s:?}"))?;
            if deg > 0.0 && deg < 90.0 {
                Ok(Caps::Angle(deg))
            } else {
                Err(format!("caps angle must be > 0 and < 90, got {deg}"))
            }
        }
    }
}

/// Parse a `POSITION,WIDTH` pair of degrees.
pub fn parse_meridian(s: &str) -> Result<(f64, f64), String> {
    let (position, width) = s
        .split_once(',')
        .ok_or_else(|| format!("expected POSITION,WIDTH, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad number {v:?} in meridian: {e}"))
    };
    let (position, width) = (parse(position)?, parse(width)?);
    if width < 0.0 {
        return Err(format!("meridian width must not be negative, got {width}"));
    }
    Ok((position, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        CliArgs::parse_from(["orbis", "world.png"].iter().chain(extra))
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = args(&[
            "--points",
            "20000",
            "--projection",
            "mollweide",
            "--caps",
            "none",
            "--type",
            "stl",
            "--meridian",
            "0,1",
            "--meridian",
            "-90,2.5",
            "--channel",
            "hue",
            "--no-ratio-check",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(args.image, PathBuf::from("world.png"));
        assert_eq!(config.mesh.points, 20_000);
        assert_eq!(config.mesh.projection, ProjectionKind::Mollweide);
        assert_eq!(config.mesh.caps, Caps::None);
        assert_eq!(config.output.format, OutputFormat::Stl);
        assert_eq!(config.mesh.meridians, [(0.0, 1.0), (-90.0, 2.5)]);
        assert_eq!(config.image.channel, Channel::Hue);
        assert!(!config.image.fix_ratio);
        // Non-overridden fields retain defaults
        assert_eq!(config.mesh.scale, 0.02);
        assert_eq!(config.mesh.caps_height, 1.03);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&args(&[]));
        assert_eq!(config, original);
    }

    #[test]
    fn test_no_meridians_clears_list() {
        let mut config = Config::default();
        config.apply_cli_overrides(&args(&["--no-meridians"]));
        assert!(config.mesh.meridians.is_empty());
    }

    #[test]
    fn test_parse_caps() {
        assert_eq!(parse_caps("auto"), Ok(Caps::Auto));
        assert_eq!(parse_caps("None"), Ok(Caps::None));
        assert_eq!(parse_caps("30"), Ok(Caps::Angle(30.0)));
        assert!(parse_caps("90").is_err());
        assert!(parse_caps("0").is_err());
        assert!(parse_caps("polar").is_err());
    }

    #[test]
    fn test_parse_meridian() {
        assert_eq!(parse_meridian("10, 1.5"), Ok((10.0, 1.5)));
        assert!(parse_meridian("10").is_err());
        assert!(parse_meridian("10,-1").is_err());
        assert!(parse_meridian("a,1").is_err());
    }

    #[test]
    fn test_invalid_caps_rejected_by_parser() {
        let result = CliArgs::try_parse_from(["orbis", "world.png", "--caps", "120"]);
        assert!(result.is_err());
    }
}
