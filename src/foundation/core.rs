use std::time::Duration;

use crate::foundation::error::{RetroError, RetroResult};

pub use kurbo::{Affine, Point, Vec2};

/// Straight-alpha RGBA8 raster, row-major, 4 samples per pixel.
///
/// This is the "canvas" every pipeline stage reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` samples.
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Wrap an existing sample buffer, checking its length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RetroResult<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(RetroError::validation(format!(
                "rgba buffer has {} samples, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single straight-alpha colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RetroResult<Self> {
        let px = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| RetroError::validation("frame size overflow"))?;
        Self::new(width, height, rgba.repeat(px))
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Sample offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Longer edge in pixels.
    pub fn longer_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Returns an error unless `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: &RgbaFrame) -> RetroResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(RetroError::evaluation(format!(
                "frame size mismatch: {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(())
    }
}

pub(crate) fn expected_len(width: u32, height: u32) -> RetroResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RetroError::validation("frame size overflow"))
}

/// Viewport size class reported by the host ("is narrow viewport").
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    /// Phone-sized viewport.
    Narrow,
    /// Everything else.
    #[default]
    Wide,
}

impl ViewportClass {
    /// Longest edge of the working canvas for this class.
    pub fn max_working_dim(self) -> u32 {
        match self {
            Self::Narrow => 1200,
            Self::Wide => 2400,
        }
    }

    /// Minimum spacing between sparkle animation frames (`None` = uncapped).
    pub fn frame_interval(self) -> Option<Duration> {
        match self {
            Self::Narrow => Some(Duration::from_millis(32)), // ~30 fps
            Self::Wide => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
