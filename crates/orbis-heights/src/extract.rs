//! Height and color fields from decoded RGBA rasters.

use image::RgbaImage;
use orbis_sphere::{ColorField, Grid, HeightField};
use rustc_hash::FxHashMap;

use crate::channel::{Channel, hsv};
use crate::error::HeightsError;

/// Height field read from `channel` of every pixel. Row 0 is the top of the image.
pub fn heights_from_image(img: &RgbaImage, channel: Channel) -> Result<HeightField, HeightsError> {
    ensure_not_empty(img)?;
    let heights = match channel {
        Channel::Color => {
            let ranks = color_ranks(img);
            pixels(img).map(|px| ranks.get(&px).copied().unwrap_or(0.0))
        }
        _ => pixels(img).map(|px| channel.sample(px)),
    };
    tracing::debug!(
        width = heights.width(),
        height = heights.height(),
        channel = %channel,
        "heights extracted"
    );
    Ok(heights)
}

/// Raw RGBA colors of every pixel.
pub fn colors_from_image(img: &RgbaImage) -> Result<ColorField, HeightsError> {
    ensure_not_empty(img)?;
    Ok(pixels(img))
}

/// Negate every height, so valleys become peaks.
pub fn invert_heights(heights: &HeightField) -> HeightField {
    heights.map(|h| -h)
}

/// Height rank of every distinct color of a palette map.
///
/// Colors are ordered by descending hue, then ascending value, and colors
/// sharing both get the same rank. Water-blue hues therefore sit below
/// greens and browns.
pub fn color_ranks(img: &RgbaImage) -> FxHashMap<[u8; 4], f64> {
    let mut keys: FxHashMap<[u8; 4], (i32, u8)> = FxHashMap::default();
    for px in img.pixels() {
        keys.entry(px.0).or_insert_with(|| {
            let [r, g, b, _] = px.0;
            let [h, _, v] = hsv([r, g, b]);
            (-i32::from(h), v)
        });
    }

    let mut order: Vec<(i32, u8)> = keys.values().copied().collect();
    order.sort_unstable();
    order.dedup();

    keys.into_iter()
        .map(|(color, key)| {
            let rank = order.binary_search(&key).unwrap_or_default();
            (color, rank as f64)
        })
        .collect()
}

fn pixels(img: &RgbaImage) -> Grid<[u8; 4]> {
    Grid::from_fn(img.width() as usize, img.height() as usize, |i, j| {
        img.get_pixel(i as u32, j as u32).0
    })
}

fn ensure_not_empty(img: &RgbaImage) -> Result<(), HeightsError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(HeightsError::EmptyImage {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn stripes(colors: &[[u8; 4]]) -> RgbaImage {
        RgbaImage::from_fn(colors.len() as u32, 2, |i, _| Rgba(colors[i as usize]))
    }

    #[test]
    fn test_val_channel_orientation() {
        let img = RgbaImage::from_fn(3, 2, |i, j| {
            let v = (10 * i + 100 * j) as u8;
            Rgba([v, 0, 0, 255])
        });
        let heights = heights_from_image(&img, Channel::Val).unwrap();
        assert_eq!((heights.width(), heights.height()), (3, 2));
        assert_eq!(heights.get(2, 0), 20.0);
        assert_eq!(heights.get(1, 1), 110.0);
    }

    #[test]
    fn test_color_ranks_by_hue_then_value() {
        let red = [255, 0, 0, 255];
        let dark_red = [128, 0, 0, 255];
        let blue = [0, 0, 255, 255];
        let heights = heights_from_image(&stripes(&[red, dark_red, blue, red]), Channel::Color).unwrap();
        assert_eq!(heights.get(2, 0), 0.0);
        assert_eq!(heights.get(1, 0), 1.0);
        assert_eq!(heights.get(0, 0), 2.0);
        assert_eq!(heights.get(3, 1), 2.0);
    }

    #[test]
    fn test_same_hue_and_value_share_rank() {
        // Differ only in saturation.
        let a = [200, 0, 0, 255];
        let b = [200, 100, 100, 255];
        let ranks = color_ranks(&stripes(&[a, b]));
        assert_eq!(ranks[&a], ranks[&b]);
    }

    #[test]
    fn test_invert() {
        let heights = Grid::from_fn(2, 1, |i, _| i as f64 + 1.0);
        let inverted = invert_heights(&heights);
        assert_eq!(inverted.cells(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = heights_from_image(&RgbaImage::new(0, 4), Channel::R).unwrap_err();
        assert!(matches!(err, HeightsError::EmptyImage { width: 0, height: 4 }));
        assert!(colors_from_image(&RgbaImage::new(3, 0)).is_err());
    }

    #[test]
    fn test_colors_keep_alpha() {
        let colors = colors_from_image(&stripes(&[[1, 2, 3, 4]])).unwrap();
        assert_eq!(colors.get(0, 1), [1, 2, 3, 4]);
    }
}
