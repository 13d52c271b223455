//! Center-crops generated images to a target aspect ratio.

use image::codecs::jpeg::JpegEncoder;

use crate::error::ServiceError;

/// Panel aspect ratio the frontend renders at.
pub const TARGET_ASPECT: f64 = 16.0 / 9.0;

/// JPEG quality for re-encoded crops.
const JPEG_QUALITY: u8 = 90;

/// Decode `bytes`, center-crop to `target_ratio`, re-encode as JPEG.
///
/// Whichever dimension overshoots the ratio is reduced; output dimensions
/// never exceed the input's. Single pass, deterministic for a given input.
pub fn center_crop_to_aspect(bytes: &[u8], target_ratio: f64) -> Result<Vec<u8>, ServiceError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = (img.width(), img.height());

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cropped = if f64::from(width) / f64::from(height) > target_ratio {
        // Too wide: trim the sides.
        let new_width = (f64::from(height) * target_ratio) as u32;
        let left = (width - new_width) / 2;
        img.crop_imm(left, 0, new_width, height)
    } else {
        // Too tall: trim top and bottom.
        let new_height = (f64::from(width) / target_ratio) as u32;
        let top = (height - new_height) / 2;
        img.crop_imm(0, top, width, new_height)
    };

    // JPEG has no alpha channel.
    let rgb = cropped.to_rgb8();
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(out)
}
