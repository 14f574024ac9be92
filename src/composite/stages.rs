//! Canvas-level effects applied after the pixel pass.
//!
//! Order matters: each stage reads the cumulative canvas left by the previous one. See
//! [`CompositeStage::ORDER`].

use crate::composite::blend::{
    BlendMode, BlendParams, blend_frame_in_place, blend_shifted_in_place, fill_in_place,
};
use crate::composite::blur::gaussian_blur;
use crate::composite::gradient::{ColorStop, LinearGradient, RadialGradient};
use crate::foundation::core::{Point, RgbaFrame};
use crate::foundation::error::RetroResult;
use crate::foundation::math::clamp_u8;

const LIGHT_LEAK_RGB: [f32; 3] = [1.0, 128.0 / 255.0, 0.0];
const LIGHT_LEAK_PEAK: f32 = 0.3;
const DISPERSION_SHIFT_PX: i32 = 2;
const SHADOW_THRESHOLD: f32 = 128.0;
const SHADOW_BLUE_GAIN: f32 = 50.0;

/// Compositing stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeStage {
    /// Blurred copy screened back on.
    Halation,
    /// Radial darkening towards the corners.
    Vignette,
    /// Sparkle overlay (re)initialisation point; draws nothing into the static canvas.
    Sparkle,
    /// Warm diagonal streak.
    LightLeak,
    /// Red and blue channel fringes.
    Dispersion,
    /// Blue lift in the shadows (keer).
    ShadowTint,
}

impl CompositeStage {
    /// Execution order; each stage reads the canvas the previous one left.
    pub const ORDER: [CompositeStage; 6] = [
        Self::Halation,
        Self::Vignette,
        Self::Sparkle,
        Self::LightLeak,
        Self::Dispersion,
        Self::ShadowTint,
    ];
}

/// Screen a blurred copy of the canvas back onto itself.
///
/// Blur sigma is `amount * 10` px and the copy is drawn at opacity `amount`.
pub fn apply_halation(frame: &mut RgbaFrame, amount: f32) -> RetroResult<()> {
    if !(amount > 0.0) {
        return Ok(());
    }
    let blurred = gaussian_blur(frame, amount * 10.0)?;
    blend_frame_in_place(frame, &blurred, BlendParams::new(BlendMode::Screen, amount))
}

/// Multiply a centred radial gradient: clear to half the radius, then ramping to black at alpha
/// `amount` at `max(w, h) / 2`.
pub fn apply_vignette(frame: &mut RgbaFrame, amount: f32) -> RetroResult<()> {
    if !(amount > 0.0) {
        return Ok(());
    }
    let (w, h) = (f64::from(frame.width), f64::from(frame.height));
    let gradient = RadialGradient {
        center: Point::new(w / 2.0, h / 2.0),
        radius: w.max(h) / 2.0,
        stops: vec![
            ColorStop::new(0.0, [0.0, 0.0, 0.0, 0.0]),
            ColorStop::new(0.5, [0.0, 0.0, 0.0, 0.0]),
            ColorStop::new(1.0, [0.0, 0.0, 0.0, amount.min(1.0)]),
        ],
    };
    fill_in_place(
        frame,
        |p| gradient.sample(p),
        BlendParams::new(BlendMode::Multiply, 1.0),
    )
}

/// Screen a warm diagonal streak, transparent at both corners and peaking mid-frame.
pub fn apply_light_leak(frame: &mut RgbaFrame, amount: f32) -> RetroResult<()> {
    if !(amount > 0.0) {
        return Ok(());
    }
    let [r, g, b] = LIGHT_LEAK_RGB;
    let peak = (amount * LIGHT_LEAK_PEAK).min(1.0);
    let gradient = LinearGradient {
        start: Point::ZERO,
        end: Point::new(f64::from(frame.width), f64::from(frame.height)),
        stops: vec![
            ColorStop::new(0.0, [r, g, b, 0.0]),
            ColorStop::new(0.5, [r, g, b, peak]),
            ColorStop::new(1.0, [r, g, b, 0.0]),
        ],
    };
    fill_in_place(
        frame,
        |p| gradient.sample(p),
        BlendParams::new(BlendMode::Screen, 1.0),
    )
}

/// Screen a red copy shifted left and a blue copy shifted right, both taken from the canvas as
/// it was before this stage.
pub fn apply_dispersion(frame: &mut RgbaFrame, amount: f32) -> RetroResult<()> {
    if !(amount > 0.0) {
        return Ok(());
    }
    let snapshot = frame.clone();
    let params = BlendParams::new(BlendMode::Screen, amount * 0.5);
    blend_shifted_in_place(
        frame,
        &snapshot,
        -DISPERSION_SHIFT_PX,
        [1.0, 0.0, 0.0],
        params,
    )?;
    blend_shifted_in_place(
        frame,
        &snapshot,
        DISPERSION_SHIFT_PX,
        [0.0, 0.0, 1.0],
        params,
    )
}

/// Raise blue by `amount * 50` on every pixel whose channel average is below 128.
///
/// Never lowers a channel; `amount <= 0` leaves the buffer untouched.
pub fn apply_shadow_tint(frame: &mut RgbaFrame, amount: f32) {
    if !(amount > 0.0) {
        return;
    }
    let lift = amount * SHADOW_BLUE_GAIN;
    for px in frame.data.chunks_exact_mut(4) {
        let brightness = (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0;
        if brightness < SHADOW_THRESHOLD {
            px[2] = clamp_u8((f32::from(px[2]) + lift).min(255.0));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/stages.rs"]
mod tests;
