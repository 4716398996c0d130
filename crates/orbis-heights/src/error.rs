//! Raster loading error types.

/// Errors raised while turning an image into a height or color field.
#[derive(Debug, thiserror::Error)]
pub enum HeightsError {
    /// The image could not be opened or decoded.
    #[error("image load error: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// The decoded image has no pixels.
    #[error("image is empty ({width}x{height})")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The channel name is not recognised.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}
