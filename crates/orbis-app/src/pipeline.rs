//! End-to-end runs shared by the binaries: check paths, build the whole mesh,
//! and only then open the output file.

use std::path::{Path, PathBuf};

use orbis_config::Config;
use orbis_formats::{OutputFormat, WriteOptions, mesh_from_asc_file, write_mesh_file};
use orbis_heights::{load_color_field, load_height_field, load_logo};
use orbis_sphere::{LogoSettings, Logos, Mesh, ProjectionKind, build_mesh, paint_mesh};

use crate::error::AppError;

/// `explicit`, or `input` with the format's extension.
pub fn output_path(input: &Path, explicit: Option<&Path>, format: OutputFormat) -> PathBuf {
    explicit.map_or_else(|| input.with_extension(format.extension()), Path::to_path_buf)
}

/// Fail if `path` does not exist.
pub fn ensure_input(path: &Path) -> Result<(), AppError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::MissingInput(path.to_path_buf()))
    }
}

/// Fail if `path` exists and `overwrite` is false.
pub fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), AppError> {
    if !overwrite && path.exists() {
        return Err(AppError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// Logo height fields named in the configuration.
pub fn load_logos(config: &Config) -> Result<Logos, AppError> {
    let load = |path: &Option<PathBuf>, scale: f64| -> Result<Option<LogoSettings>, AppError> {
        let Some(path) = path else {
            return Ok(None);
        };
        ensure_input(path)?;
        tracing::info!(path = %path.display(), "adding logo");
        Ok(Some(LogoSettings {
            heights: load_logo(path)?,
            scale,
        }))
    };
    Ok(Logos {
        north: load(&config.mesh.logo_north, config.mesh.logo_north_scale)?,
        south: load(&config.mesh.logo_south, config.mesh.logo_south_scale)?,
    })
}

/// Mesh of the map image at `image` with every configured feature.
pub fn build_map_mesh(image: &Path, config: &Config) -> Result<Mesh, AppError> {
    ensure_input(image)?;
    let settings = config.mesh_settings()?;
    let logos = load_logos(config)?;
    let heights = load_height_field(image, settings.projection, &config.height_options())?;
    Ok(build_mesh(&heights, &settings, &logos)?)
}

/// Build the map mesh and write it. Returns the output path.
pub fn run_map(image: &Path, output: Option<&Path>, config: &Config) -> Result<PathBuf, AppError> {
    let format = config.output.format;
    let output = output_path(image, output, format);
    ensure_writable(&output, config.output.overwrite)?;

    tracing::info!(image = %image.display(), "processing");
    let mesh = build_map_mesh(image, config)?;
    write_mesh_file(&output, &mesh, format, config.write_options())?;
    Ok(output)
}

/// Options of a painting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOptions {
    /// Projection of the map.
    pub projection: ProjectionKind,
    /// Point budget (0 = every pixel).
    pub points: usize,
    /// Fix the aspect ratio for the projection.
    pub fix_ratio: bool,
    /// Fill dark gaps first.
    pub fill_gaps: bool,
    /// Write text PLY.
    pub ascii: bool,
    /// Replace an existing output.
    pub overwrite: bool,
}

/// Paint the image at `image` onto a unit sphere and write it as colored PLY.
pub fn run_paint(
    image: &Path,
    output: Option<&Path>,
    options: &PaintOptions,
) -> Result<PathBuf, AppError> {
    let output = output_path(image, output, OutputFormat::Ply);
    ensure_writable(&output, options.overwrite)?;
    ensure_input(image)?;

    let colors = load_color_field(image, options.projection, options.fix_ratio, options.fill_gaps)?;
    let mesh = paint_mesh(&colors, options.projection, options.points)?;
    let write = WriteOptions {
        ascii: options.ascii,
        invert: false,
    };
    write_mesh_file(&output, &mesh, OutputFormat::Ply, write)?;
    Ok(output)
}

/// Triangulate the point cloud at `input` and write it. Returns the output path.
pub fn run_poly(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    row_length: usize,
    options: WriteOptions,
    overwrite: bool,
) -> Result<PathBuf, AppError> {
    let output = output_path(input, output, format);
    ensure_writable(&output, overwrite)?;
    ensure_input(input)?;

    let mesh = mesh_from_asc_file(input, row_length)?;
    write_mesh_file(&output, &mesh, format, options)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn write_map(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_fn(width, height, |i, j| {
            Rgba([((i * 7 + j * 3) % 256) as u8, 90, 40, 255])
        })
        .save(&path)
        .unwrap();
        path
    }

    fn ply_header(path: &Path) -> String {
        let bytes = std::fs::read(path).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        text.split("end_header").next().unwrap().to_string()
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("maps/world.png");
        assert_eq!(
            output_path(input, None, OutputFormat::Stl),
            Path::new("maps/world.stl")
        );
        assert_eq!(
            output_path(input, Some(Path::new("out.ply")), OutputFormat::Stl),
            Path::new("out.ply")
        );
    }

    #[test]
    fn test_run_map_writes_ply() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_map(dir.path(), "world.png", 120, 100);
        let mut config = Config::default();
        config.mesh.points = 3000;

        let output = run_map(&image, None, &config).unwrap();
        assert_eq!(output, dir.path().join("world.ply"));
        let header = ply_header(&output);
        assert!(header.starts_with("ply\nformat binary_little_endian 1.0\n"));
        assert!(header.contains("comment made by orbis"));
    }

    #[test]
    fn test_existing_output_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_map(dir.path(), "world.png", 60, 50);
        let output = dir.path().join("world.ply");
        std::fs::write(&output, b"keep me").unwrap();

        let err = run_map(&image, None, &Config::default()).unwrap_err();
        assert!(matches!(err, AppError::OutputExists(_)));
        assert_eq!(std::fs::read(&output).unwrap(), b"keep me");

        let mut config = Config::default();
        config.output.overwrite = true;
        config.mesh.points = 1000;
        run_map(&image, None, &config).unwrap();
        assert_ne!(std::fs::read(&output).unwrap(), b"keep me");
    }

    #[test]
    fn test_invalid_settings_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_map(dir.path(), "world.png", 60, 50);
        let mut config = Config::default();
        config.mesh.thickness = 2.0;

        let err = run_map(&image, None, &config).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!dir.path().join("world.ply").exists());
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_map(&dir.path().join("nope.png"), None, &Config::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
    }

    #[test]
    fn test_paint_declares_colors() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_map(dir.path(), "world.png", 72, 36);
        let options = PaintOptions {
            projection: ProjectionKind::Equirectangular,
            points: 0,
            fix_ratio: true,
            fill_gaps: false,
            ascii: false,
            overwrite: false,
        };
        let output = run_paint(&image, None, &options).unwrap();
        let header = ply_header(&output);
        assert!(header.contains("element vertex 2592\n"));
        assert!(header.contains("property uchar red\n"));
    }

    #[test]
    fn test_asc_to_stl() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_map(dir.path(), "world.png", 120, 100);
        let mut config = Config::default();
        config.mesh.points = 2000;
        config.output.format = OutputFormat::Asc;
        let cloud = run_map(&image, None, &config).unwrap();
        assert_eq!(cloud.extension().unwrap(), "asc");

        let stl = run_poly(&cloud, None, OutputFormat::Stl, 0, WriteOptions::default(), false)
            .unwrap();
        let bytes = std::fs::read(&stl).unwrap();
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
        assert!(count > 0);
        assert_eq!(bytes.len(), 84 + 50 * count);
    }
}
