use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::math::clamp_u8;
use crate::params::effects::EffectParameters;

/// Samples (bytes) per chunk handed to one worker.
pub const CHUNK_SIZE: usize = 100_000;

/// Per-pixel colour pass (saturation, contrast, grain) over a fixed-size worker pool.
///
/// The sample buffer is cut into contiguous chunks which are dealt round-robin to the workers.
/// Every worker owns its chunks exclusively for the duration of the pass, so results land at
/// their original offsets without any shared mutable state. A pass returns only once every chunk
/// has been processed.
pub struct PixelPass {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl PixelPass {
    /// Build the worker pool. `None` sizes it to the available hardware parallelism.
    pub fn new(threads: Option<usize>) -> RetroResult<Self> {
        if let Some(n) = threads
            && n == 0
        {
            return Err(RetroError::validation(
                "pixel pass 'threads' must be >= 1 when set",
            ));
        }
        let workers = threads
            .or_else(|| std::thread::available_parallelism().ok().map(usize::from))
            .unwrap_or(1)
            .max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("retrofx-pixel-{i}"))
            .build()
            .map_err(|e| {
                RetroError::evaluation(format!("failed to build rayon thread pool: {e}"))
            })?;
        Ok(Self { pool, workers })
    }

    /// Number of workers chunks are distributed over.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run the pass with the standard [`CHUNK_SIZE`].
    pub fn process(
        &self,
        frame: &RgbaFrame,
        params: &EffectParameters,
        seed: u64,
    ) -> RetroResult<RgbaFrame> {
        self.process_with_chunk_size(frame, params, seed, CHUNK_SIZE)
    }

    /// Run the pass with an explicit chunk size (a positive multiple of 4 samples).
    ///
    /// For a fixed `seed` and chunk size the output is identical whatever order the chunks finish
    /// in. Without grain the output does not depend on the chunk size either.
    #[tracing::instrument(skip(self, frame, params), fields(width = frame.width, height = frame.height))]
    pub fn process_with_chunk_size(
        &self,
        frame: &RgbaFrame,
        params: &EffectParameters,
        seed: u64,
        chunk_size: usize,
    ) -> RetroResult<RgbaFrame> {
        if chunk_size == 0 || !chunk_size.is_multiple_of(4) {
            return Err(RetroError::validation(
                "pixel pass chunk size must be a positive multiple of 4",
            ));
        }
        if frame.data.len() != frame.pixel_count() * 4 {
            return Err(RetroError::evaluation(
                "pixel pass expects a buffer matching width*height*4",
            ));
        }

        let mut out = frame.data.clone();
        let params = *params;

        let mut lanes: Vec<Vec<(usize, &mut [u8])>> =
            (0..self.workers).map(|_| Vec::new()).collect();
        for (index, chunk) in out.chunks_mut(chunk_size).enumerate() {
            lanes[index % self.workers].push((index, chunk));
        }
        let chunks: usize = lanes.iter().map(Vec::len).sum();

        self.pool.scope(|s| {
            for lane in lanes {
                s.spawn(move |_| {
                    for (index, chunk) in lane {
                        let mut rng = StdRng::seed_from_u64(chunk_seed(seed, index));
                        process_chunk(chunk, &params, &mut rng);
                    }
                });
            }
        });

        tracing::debug!(chunks, workers = self.workers, "pixel pass complete");
        RgbaFrame::new(frame.width, frame.height, out)
    }
}

/// Apply saturation, contrast and grain to one chunk of RGBA samples. Alpha is left untouched.
///
/// Each step stores into 8-bit channels (round half to even, clamp) before the next reads them.
pub(crate) fn process_chunk<R: Rng>(chunk: &mut [u8], params: &EffectParameters, rng: &mut R) {
    let s = params.saturation;
    let k = params.contrast;
    let grain = params.grain;

    for px in chunk.chunks_exact_mut(4) {
        let rgb = [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])];
        let avg = (rgb[0] + rgb[1] + rgb[2]) / 3.0;

        let mut c = rgb.map(|v| clamp_u8(v * s + avg * (1.0 - s)));
        c = c.map(|v| clamp_u8((f32::from(v) - 128.0) * k + 128.0));

        if grain > 0.0 {
            // Same sample for all three channels.
            let noise = (rng.random::<f32>() - 0.5) * grain * 50.0;
            c = c.map(|v| clamp_u8(f32::from(v) + noise));
        }

        px[..3].copy_from_slice(&c);
    }
}

fn chunk_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/pass.rs"]
mod tests;
