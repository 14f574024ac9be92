use rayon::prelude::*;

use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::math::{clamp_u8, mul_div255_u8};

/// Gaussian blur with standard deviation `sigma` pixels (a CSS `blur(<sigma>px)`).
///
/// The kernel covers `ceil(3 * sigma)` pixels either side; edges clamp. Filtering happens on
/// premultiplied samples, so transparent pixels do not darken their neighbours. `sigma <= 0`
/// returns an unmodified copy.
pub fn gaussian_blur(src: &RgbaFrame, sigma: f32) -> RetroResult<RgbaFrame> {
    if !sigma.is_finite() {
        return Err(RetroError::validation("blur sigma must be finite"));
    }
    if sigma <= 0.0 || src.width == 0 || src.height == 0 {
        return Ok(src.clone());
    }
    let radius = (sigma * 3.0).ceil() as u32;
    let mut premul = src.data.clone();
    premultiply_in_place(&mut premul);
    let mut data = blur_rgba8(&premul, src.width, src.height, radius, sigma)?;
    unpremultiply_in_place(&mut data);
    RgbaFrame::new(src.width, src.height, data)
}

pub(crate) fn premultiply_in_place(rgba: &mut [u8]) {
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    });
}

pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        let a = px[3];
        if a == 0 {
            px[..3].fill(0);
            return;
        }
        let scale = 255.0 / f32::from(a);
        for c in &mut px[..3] {
            *c = clamp_u8(f32::from(*c) * scale);
        }
    });
}

pub(crate) fn blur_rgba8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> RetroResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RetroError::evaluation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(RetroError::evaluation(
            "blur_rgba8 expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> RetroResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(RetroError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(RetroError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Keep the kernel summing to exactly 1.0 so flat regions stay flat.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_len = (width as usize) * 4;
    dst.par_chunks_exact_mut(row_len)
        .zip(src.par_chunks_exact(row_len))
        .for_each(|(drow, srow)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = (sx as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(srow[idx + c]);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    drow[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_exact_mut(w * 4)
        .enumerate()
        .for_each(|(y, drow)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1);
                    let idx = ((sy as usize) * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    drow[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blur.rs"]
mod tests;
