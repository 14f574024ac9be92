use rayon::prelude::*;

use crate::foundation::core::{Point, RgbaFrame};
use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::math::{clamp_u8, u8_to_unit};

/// Separable blend mode applied when a source is composited onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Plain alpha compositing.
    SourceOver,
    /// `1 - (1 - d)(1 - s)`; only ever brightens.
    Screen,
    /// `d * s`; only ever darkens.
    Multiply,
    /// Additive (premultiplied sum, saturating).
    Lighter,
}

/// Blend mode and global opacity for exactly one compositing call.
///
/// There is no ambient "current mode": every draw states both explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendParams {
    pub mode: BlendMode,
    /// Multiplies source alpha; clamped to `[0, 1]`.
    pub opacity: f32,
}

impl BlendParams {
    /// Parameters for one draw with `mode` at `opacity`.
    pub fn new(mode: BlendMode, opacity: f32) -> Self {
        Self { mode, opacity }
    }

    fn effective_opacity(self) -> f32 {
        if self.opacity.is_nan() {
            return 0.0;
        }
        self.opacity.clamp(0.0, 1.0)
    }
}

/// Straight-alpha colour in unit floats.
pub type UnitRgba = [f32; 4];

/// Composite a unit-float straight-alpha source onto one straight-alpha RGBA8 pixel.
pub fn blend_unit(dst: [u8; 4], src: UnitRgba, params: BlendParams) -> [u8; 4] {
    let sa = src[3].clamp(0.0, 1.0) * params.effective_opacity();
    if sa <= 0.0 {
        return dst;
    }
    let da = u8_to_unit(dst[3]);
    let cd = [u8_to_unit(dst[0]), u8_to_unit(dst[1]), u8_to_unit(dst[2])];
    let cs = [
        src[0].clamp(0.0, 1.0),
        src[1].clamp(0.0, 1.0),
        src[2].clamp(0.0, 1.0),
    ];

    let mut out = [0u8; 4];
    match params.mode {
        BlendMode::Lighter => {
            let ao = (sa + da).min(1.0);
            for i in 0..3 {
                let co = (cs[i] * sa + cd[i] * da).min(1.0);
                out[i] = clamp_u8(co / ao * 255.0);
            }
            out[3] = clamp_u8(ao * 255.0);
        }
        mode => {
            let ao = sa + da * (1.0 - sa);
            for i in 0..3 {
                let b = match mode {
                    BlendMode::Screen => cd[i] + cs[i] - cd[i] * cs[i],
                    BlendMode::Multiply => cd[i] * cs[i],
                    _ => cs[i],
                };
                let mixed = (1.0 - da) * cs[i] + da * b;
                let co = sa * mixed + (1.0 - sa) * da * cd[i];
                out[i] = clamp_u8(co / ao * 255.0);
            }
            out[3] = clamp_u8(ao * 255.0);
        }
    }
    out
}

/// Composite one RGBA8 pixel onto another.
pub fn blend_pixel(dst: [u8; 4], src: [u8; 4], params: BlendParams) -> [u8; 4] {
    blend_unit(
        dst,
        [
            u8_to_unit(src[0]),
            u8_to_unit(src[1]),
            u8_to_unit(src[2]),
            u8_to_unit(src[3]),
        ],
        params,
    )
}

/// Composite a same-sized frame onto `dst`.
pub fn blend_frame_in_place(
    dst: &mut RgbaFrame,
    src: &RgbaFrame,
    params: BlendParams,
) -> RetroResult<()> {
    dst.ensure_same_size(src)?;
    dst.data
        .par_chunks_exact_mut(4)
        .zip(src.data.par_chunks_exact(4))
        .for_each(|(d, s)| {
            let out = blend_pixel([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], params);
            d.copy_from_slice(&out);
        });
    Ok(())
}

/// Composite `src` translated by `dx` pixels on x, multiplied by `tint`, onto `dst`.
///
/// Destination pixels with no source pixel under them are left untouched.
pub fn blend_shifted_in_place(
    dst: &mut RgbaFrame,
    src: &RgbaFrame,
    dx: i32,
    tint: [f32; 3],
    params: BlendParams,
) -> RetroResult<()> {
    dst.ensure_same_size(src)?;
    let w = dst.width as usize;
    if w == 0 {
        return Ok(());
    }
    let row_len = w * 4;
    dst.data
        .par_chunks_exact_mut(row_len)
        .zip(src.data.par_chunks_exact(row_len))
        .for_each(|(drow, srow)| {
            for x in 0..w {
                let sx = x as i64 - i64::from(dx);
                if sx < 0 || sx >= w as i64 {
                    continue;
                }
                let si = (sx as usize) * 4;
                let di = x * 4;
                let src_px = [
                    u8_to_unit(srow[si]) * tint[0],
                    u8_to_unit(srow[si + 1]) * tint[1],
                    u8_to_unit(srow[si + 2]) * tint[2],
                    u8_to_unit(srow[si + 3]),
                ];
                let d = [drow[di], drow[di + 1], drow[di + 2], drow[di + 3]];
                drow[di..di + 4].copy_from_slice(&blend_unit(d, src_px, params));
            }
        });
    Ok(())
}

/// Fill the whole frame with a per-pixel shader, sampled at pixel centres.
pub fn fill_in_place<F>(dst: &mut RgbaFrame, shader: F, params: BlendParams) -> RetroResult<()>
where
    F: Fn(Point) -> UnitRgba + Sync,
{
    let w = dst.width as usize;
    if w == 0 || dst.height == 0 {
        return Ok(());
    }
    if dst.data.len() != w * dst.height as usize * 4 {
        return Err(RetroError::evaluation(
            "fill_in_place expects a buffer matching width*height*4",
        ));
    }
    dst.data
        .par_chunks_exact_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, d) in row.chunks_exact_mut(4).enumerate() {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let out = blend_unit([d[0], d[1], d[2], d[3]], shader(p), params);
                d.copy_from_slice(&out);
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
