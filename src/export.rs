use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use crate::assets::source::fit_within;
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::math::mul_div255_u8;
use crate::params::preset::FilterPreset;

/// An encoded download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// JPEG bytes.
    pub bytes: Vec<u8>,
    /// Suggested file name, `retro-<brand>-<name>.jpg`.
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

pub fn export_filename(preset: &FilterPreset) -> String {
    let name = format!("retro-{}-{}.jpg", preset.brand, preset.name);
    name.replace(['/', '\\'], "-")
}

/// The RGB raster that gets encoded: downscaled to `max_dim` and flattened over black.
pub fn prepare_for_export(frame: &RgbaFrame, max_dim: u32) -> RetroResult<image::RgbImage> {
    let scaled = fit_within(frame, max_dim)?;
    let mut rgb = Vec::with_capacity(scaled.pixel_count() * 3);
    for px in scaled.data.chunks_exact(4) {
        let a = u16::from(px[3]);
        rgb.extend_from_slice(&[
            mul_div255_u8(u16::from(px[0]), a),
            mul_div255_u8(u16::from(px[1]), a),
            mul_div255_u8(u16::from(px[2]), a),
        ]);
    }
    image::RgbImage::from_raw(scaled.width, scaled.height, rgb)
        .ok_or_else(|| RetroError::evaluation("export buffer does not match its dimensions"))
}

/// Encode `frame` as a quality-`quality` JPEG no larger than `max_dim` on its longer edge.
#[tracing::instrument(skip(frame, preset), fields(preset = preset.id))]
pub fn export_jpeg(
    frame: &RgbaFrame,
    preset: &FilterPreset,
    quality: u8,
    max_dim: u32,
) -> RetroResult<ExportedImage> {
    if !(1..=100).contains(&quality) {
        return Err(RetroError::validation("jpeg quality must be in 1..=100"));
    }
    let rgb = prepare_for_export(frame, max_dim)?;
    let (width, height) = rgb.dimensions();

    let mut buf = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(|e| RetroError::encode(format!("jpeg encode: {e}")))?;
    let bytes = buf.into_inner();
    tracing::debug!(width, height, bytes = bytes.len(), "exported jpeg");

    Ok(ExportedImage {
        bytes,
        filename: export_filename(preset),
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
