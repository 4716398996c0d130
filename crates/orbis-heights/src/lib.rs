//! Map rasters to height and color fields for the sphere mesher.
//!
//! Images are decoded to RGBA, optionally gap-filled and resized to the
//! projection's aspect ratio, then reduced to one value per pixel.

mod channel;
mod error;
mod extract;
mod prepare;

use std::path::Path;

use orbis_sphere::{ColorField, HeightField, ProjectionKind};

pub use channel::{Channel, hsv};
pub use error::HeightsError;
pub use extract::{color_ranks, colors_from_image, heights_from_image, invert_heights};
pub use prepare::{DARKEST_FILL, TOO_DARK, fill_dark, fix_ratio, open_image};

/// How a map image is turned into heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightOptions {
    /// Channel carrying elevation.
    pub channel: Channel,
    /// Negate the extracted heights.
    pub invert: bool,
    /// Resize to the projection's expected aspect ratio.
    pub fix_ratio: bool,
    /// Fill near-black pixels before extraction.
    pub fill_gaps: bool,
}

impl Default for HeightOptions {
    fn default() -> Self {
        Self {
            channel: Channel::Val,
            invert: false,
            fix_ratio: true,
            fill_gaps: false,
        }
    }
}

/// Decode `path` and preprocess it for `projection`.
pub fn load_map_image(
    path: &Path,
    projection: ProjectionKind,
    fix: bool,
    fill_gaps: bool,
) -> Result<image::RgbaImage, HeightsError> {
    let mut img = open_image(path)?;
    if fill_gaps {
        img = fill_dark(img);
    }
    if fix {
        img = fix_ratio(img, projection);
    }
    Ok(img)
}

/// Height field of the map image at `path`.
pub fn load_height_field(
    path: &Path,
    projection: ProjectionKind,
    options: &HeightOptions,
) -> Result<HeightField, HeightsError> {
    let img = load_map_image(path, projection, options.fix_ratio, options.fill_gaps)?;
    let heights = heights_from_image(&img, options.channel)?;
    Ok(if options.invert {
        invert_heights(&heights)
    } else {
        heights
    })
}

/// Color field of the map image at `path`, for painting.
pub fn load_color_field(
    path: &Path,
    projection: ProjectionKind,
    fix: bool,
    fill_gaps: bool,
) -> Result<ColorField, HeightsError> {
    let img = load_map_image(path, projection, fix, fill_gaps)?;
    colors_from_image(&img)
}

/// Height field of a polar logo: brightness, no preprocessing.
pub fn load_logo(path: &Path) -> Result<HeightField, HeightsError> {
    heights_from_image(&open_image(path)?, Channel::Val)
}
