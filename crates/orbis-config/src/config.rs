//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use orbis_formats::{OutputFormat, WriteOptions};
use orbis_heights::{Channel, HeightOptions};
use orbis_sphere::{Caps, FLAT_EPSILON, MeshSettings, Meridian, ProjectionKind};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside a config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mesh geometry settings.
    pub mesh: MeshConfig,
    /// How the map image is read.
    pub image: ImageConfig,
    /// Output file settings.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Mesh geometry configuration. Angles are in degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Projection the map is drawn in.
    pub projection: ProjectionKind,
    /// Maximum number of map points (0 = every pixel).
    pub points: usize,
    /// Fraction of the radius between the lowest and highest point.
    pub scale: f64,
    /// Polar caps: `auto`, `none` or `angle(deg)`.
    pub caps: Caps,
    /// Radius of the caps.
    pub caps_height: f64,
    /// Raised meridians as `(position, width)`.
    pub meridians: Vec<(f64, f64)>,
    /// Radius of the meridians at the equator.
    pub meridians_height: f64,
    /// Width of the raised equator band (0 = none).
    pub equator_width: f64,
    /// Radius of the equator band.
    pub equator_height: f64,
    /// Thickness of the hollow shell (0 = solid).
    pub thickness: f64,
    /// Image placed over the north pole instead of a cap.
    pub logo_north: Option<PathBuf>,
    /// Image placed over the south pole instead of a cap.
    pub logo_south: Option<PathBuf>,
    /// Height multiplier of the north logo.
    pub logo_north_scale: f64,
    /// Height multiplier of the south logo.
    pub logo_south_scale: f64,
}

/// Map image configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Channel holding the elevation.
    pub channel: Channel,
    /// Invert the elevations.
    pub invert: bool,
    /// Resize images whose aspect ratio does not match the projection.
    pub fix_ratio: bool,
    /// Fill dark areas (missing data) with nearby colors.
    pub fill_gaps: bool,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// File format.
    pub format: OutputFormat,
    /// Text instead of binary PLY.
    pub ascii: bool,
    /// Flip the orientation of every face.
    pub invert_faces: bool,
    /// Replace an existing output file.
    pub overwrite: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub json_log: bool,
}

// --- Default implementations ---

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Mercator,
            points: 0,
            scale: 0.02,
            caps: Caps::Auto,
            caps_height: 1.03,
            meridians: vec![(0.0, 1.0)],
            meridians_height: 1.03,
            equator_width: 0.0,
            equator_height: 1.03,
            thickness: 0.0,
            logo_north: None,
            logo_south: None,
            logo_north_scale: 1.0,
            logo_south_scale: 1.0,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Val,
            invert: false,
            fix_ratio: true,
            fill_gaps: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_log: false,
        }
    }
}

// --- Conversions ---

impl Config {
    /// Validated mesh settings, with angles in radians.
    ///
    /// Point clouds (ASC output) are built without faces.
    pub fn mesh_settings(&self) -> Result<MeshSettings, ConfigError> {
        let mesh = &self.mesh;
        let settings = MeshSettings {
            projection: mesh.projection,
            points: mesh.points,
            scale: mesh.scale,
            caps: mesh.caps,
            caps_height: mesh.caps_height,
            meridians: mesh
                .meridians
                .iter()
                .map(|&(position, width)| Meridian::from_degrees(position, width))
                .collect(),
            meridians_height: mesh.meridians_height,
            equator_width: mesh.equator_width.to_radians(),
            equator_height: mesh.equator_height,
            thickness: mesh.thickness,
            with_faces: self.output.format != OutputFormat::Asc,
            flat_epsilon: FLAT_EPSILON,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// How the map image becomes a height field.
    pub fn height_options(&self) -> HeightOptions {
        HeightOptions {
            channel: self.image.channel,
            invert: self.image.invert,
            fix_ratio: self.image.fix_ratio,
            fill_gaps: self.image.fill_gaps,
        }
    }

    /// Options for the mesh writer.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            ascii: self.output.ascii,
            invert: self.output.invert_faces,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
