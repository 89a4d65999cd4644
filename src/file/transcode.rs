//! Image re-encoding to lossy WebP.

use image::DynamicImage;

use crate::{FilehostError, Result};

/// Decode an uploaded image and re-encode it as lossy WebP.
///
/// The input format is detected from content, not from the filename.
/// The encoder only takes 8-bit RGB or RGBA, so every other colour model
/// (indexed colour with transparency, greyscale, 16-bit, float) is widened
/// to RGBA8 before encoding.
pub fn transcode_to_webp(content: &[u8], quality: f32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(content)
        .map_err(|e| FilehostError::ImageDecode(e.to_string()))?;

    let (width, height) = (img.width(), img.height());

    let encoded = match img {
        DynamicImage::ImageRgb8(rgb) => {
            webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
        }
        other => {
            let rgba = other.into_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
        }
    }
    .map_err(|e| FilehostError::ImageEncode(format!("{e:?}")))?;

    Ok(encoded.to_vec())
}
