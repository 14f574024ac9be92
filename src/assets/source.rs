use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::core::{RgbaFrame, ViewportClass};
use crate::foundation::error::{RetroError, RetroResult};

/// `true` for any `image/*` MIME type (parameters and case ignored).
pub fn is_image_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    essence
        .get(..6)
        .is_some_and(|p| p.eq_ignore_ascii_case("image/"))
        && essence.len() > 6
}

/// Container format recognised from magic bytes, if any.
pub fn sniff_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decoded upload at full resolution. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SourceImage {
    original: Arc<RgbaFrame>,
}

impl SourceImage {
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> RetroResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| RetroError::decode(format!("decode image from memory: {e}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(RetroError::decode("image has no pixels"));
        }
        let frame = RgbaFrame::new(width, height, rgba.into_raw())?;
        tracing::debug!(width, height, "decoded source image");
        Ok(Self {
            original: Arc::new(frame),
        })
    }

    pub fn from_frame(frame: RgbaFrame) -> Self {
        Self {
            original: Arc::new(frame),
        }
    }

    pub fn original(&self) -> &RgbaFrame {
        &self.original
    }

    pub fn width(&self) -> u32 {
        self.original.width
    }

    pub fn height(&self) -> u32 {
        self.original.height
    }

    /// Unfiltered working buffer sized for `viewport`.
    pub fn working_copy(&self, viewport: ViewportClass) -> RetroResult<RgbaFrame> {
        fit_within(&self.original, viewport.max_working_dim())
    }
}

/// Uniformly downscale so the longer edge is at most `max_dim`; never upscales.
///
/// Scaled dimensions are truncated, with a floor of 1 px.
pub fn fit_within(frame: &RgbaFrame, max_dim: u32) -> RetroResult<RgbaFrame> {
    if max_dim == 0 {
        return Err(RetroError::validation("max dimension must be >= 1"));
    }
    let longer = frame.longer_edge();
    if longer <= max_dim {
        return Ok(frame.clone());
    }
    let scale = f64::from(max_dim) / f64::from(longer);
    let w = ((f64::from(frame.width) * scale) as u32).max(1);
    let h = ((f64::from(frame.height) * scale) as u32).max(1);

    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| RetroError::evaluation("rgba buffer does not match its dimensions"))?;
    let resized = image::imageops::resize(&img, w, h, FilterType::Triangle);
    RgbaFrame::new(w, h, resized.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
