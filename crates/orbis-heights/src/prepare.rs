//! Raster preprocessing: decoding, aspect-ratio correction and gap filling.

use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use orbis_sphere::ProjectionKind;

use crate::error::HeightsError;

/// Pixels darker than this HSV value are treated as missing data.
pub const TOO_DARK: u8 = 30;
/// Only pixels brighter than this are used to fill gaps.
pub const DARKEST_FILL: u8 = 50;

/// Decode an image file into RGBA.
pub fn open_image(path: &Path) -> Result<RgbaImage, HeightsError> {
    let img = image::open(path)?.to_rgba8();
    tracing::info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "image loaded"
    );
    Ok(img)
}

/// Resize `img` vertically if `projection` expects a different aspect ratio.
///
/// Returns the image untouched when the ratio is already right or the
/// projection does not constrain it.
pub fn fix_ratio(img: RgbaImage, projection: ProjectionKind) -> RgbaImage {
    let (width, height) = img.dimensions();
    let Some(expected) = projection.expected_height(width as usize) else {
        return img;
    };
    let expected = expected as u32;
    if expected == 0 || expected == height {
        return img;
    }
    tracing::warn!(
        projection = %projection,
        width,
        height,
        expected,
        "image ratio does not match the projection; resizing (consider fixing the source image)"
    );
    image::imageops::resize(&img, width, expected, FilterType::Lanczos3)
}

/// Replace near-black pixels, which usually mark areas with no data, with the
/// last sufficiently bright pixel seen in row-major order.
///
/// Dark pixels before any bright one become white.
pub fn fill_dark(mut img: RgbaImage) -> RgbaImage {
    let mut last_fill = Rgba([255, 255, 255, 255]);
    let mut filled = 0usize;
    for px in img.pixels_mut() {
        let value = px.0[0].max(px.0[1]).max(px.0[2]);
        if value < TOO_DARK {
            *px = last_fill;
            filled += 1;
        } else if value > DARKEST_FILL {
            last_fill = *px;
        }
    }
    tracing::debug!(filled, "dark pixels filled");
    img
}
