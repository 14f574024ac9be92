use crate::composite::stages::{
    CompositeStage, apply_dispersion, apply_halation, apply_light_leak, apply_shadow_tint,
    apply_vignette,
};
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::RetroResult;
use crate::params::effects::EffectParameters;
use crate::pixel::pass::{CHUNK_SIZE, PixelPass};

/// What the sparkle overlay should be (re)built with after a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkleSpec {
    pub width: u32,
    pub height: u32,
    pub intensity: f32,
}

/// Result of one full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// The static composited canvas (sparkles not drawn).
    pub frame: RgbaFrame,
    pub sparkle: SparkleSpec,
}

/// Pixel pass followed by the compositing stages, in fixed order.
pub struct EffectsPipeline {
    pixel_pass: PixelPass,
    chunk_size: usize,
}

impl EffectsPipeline {
    pub fn new(pixel_pass: PixelPass) -> Self {
        Self {
            pixel_pass,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn pixel_pass(&self) -> &PixelPass {
        &self.pixel_pass
    }

    /// Produce the filtered canvas for `source` under `params`.
    ///
    /// `source` is never modified; every run starts from the unfiltered working copy.
    #[tracing::instrument(skip(self, source, params), fields(width = source.width, height = source.height))]
    pub fn run(
        &self,
        source: &RgbaFrame,
        params: &EffectParameters,
        seed: u64,
    ) -> RetroResult<PipelineOutput> {
        let mut frame = self
            .pixel_pass
            .process_with_chunk_size(source, params, seed, self.chunk_size)?;
        let mut sparkle = None;

        for stage in CompositeStage::ORDER {
            match stage {
                CompositeStage::Halation => apply_halation(&mut frame, params.halation)?,
                CompositeStage::Vignette => apply_vignette(&mut frame, params.vignette)?,
                CompositeStage::Sparkle => {
                    sparkle = Some(SparkleSpec {
                        width: frame.width,
                        height: frame.height,
                        intensity: params.keer,
                    });
                }
                CompositeStage::LightLeak => {
                    if params.light_leak {
                        apply_light_leak(&mut frame, 1.0)?;
                    }
                }
                CompositeStage::Dispersion => apply_dispersion(&mut frame, params.dispersion)?,
                CompositeStage::ShadowTint => apply_shadow_tint(&mut frame, params.keer),
            }
        }

        let sparkle = sparkle.unwrap_or(SparkleSpec {
            width: frame.width,
            height: frame.height,
            intensity: 0.0,
        });
        tracing::debug!(sparkle = sparkle.intensity, "pipeline run complete");
        Ok(PipelineOutput { frame, sparkle })
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
