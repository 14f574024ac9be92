use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::Context;

use crate::assets::source::{SourceImage, is_image_mime, sniff_format};
use crate::editor::config::EditorConfig;
use crate::editor::timing::{Debouncer, FramePacer, GraceTimer};
use crate::export::{ExportedImage, export_jpeg};
use crate::foundation::core::{RgbaFrame, ViewportClass};
use crate::foundation::error::{RetroError, RetroResult};
use crate::params::effects::{EffectKey, EffectParameters, EffectValue, apply_edit};
use crate::params::preset::{FilterPreset, default_preset, find_preset};
use crate::pipeline::{EffectsPipeline, PipelineOutput};
use crate::pixel::pass::PixelPass;
use crate::sparkle::overlay::SparkleOverlay;

/// Where the editor is in its upload → process → display cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    /// No image.
    Idle,
    /// Image accepted, no run has started for it yet.
    Loading,
    /// A pipeline run is in flight.
    Processing,
    /// The display shows the result for the latest request.
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Not an image; nothing changed.
    Ignored,
    Accepted { width: u32, height: u32 },
}

/// What one [`Editor::poll`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub run_started: bool,
    pub run_applied: bool,
    pub runs_discarded: u32,
    pub busy_cleared: bool,
    pub frame_drawn: bool,
}

/// Lifetime counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorStats {
    pub runs_started: u64,
    pub runs_applied: u64,
    pub runs_discarded: u64,
    pub frames_drawn: u64,
}

struct RunMsg {
    generation: u64,
    seed: u64,
    result: RetroResult<PipelineOutput>,
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Interactive editing session for one image at a time.
///
/// All timing is driven by the caller: every operation takes `now`, and [`Editor::poll`] must be
/// called regularly to fire timers, collect run results and advance the sparkle animation.
pub struct Editor {
    config: EditorConfig,
    pipeline: Arc<EffectsPipeline>,

    source: Option<SourceImage>,
    working: Option<Arc<RgbaFrame>>,
    composited: Option<RgbaFrame>,
    display: Option<RgbaFrame>,
    overlay: Option<SparkleOverlay>,

    preset: &'static FilterPreset,
    params: EffectParameters,
    viewport: ViewportClass,

    state: EditorState,
    busy: bool,
    debounce: Debouncer,
    grace: GraceTimer,
    run_pending: bool,
    in_flight: Option<InFlight>,
    tx: mpsc::Sender<RunMsg>,
    rx: mpsc::Receiver<RunMsg>,

    stats: EditorStats,
}

impl Editor {
    pub fn new(config: EditorConfig) -> RetroResult<Self> {
        config.validate()?;
        let pipeline = EffectsPipeline::new(PixelPass::new(config.threads)?)
            .with_chunk_size(config.chunk_size);
        let (tx, rx) = mpsc::channel();
        let preset = default_preset();
        Ok(Self {
            pipeline: Arc::new(pipeline),
            source: None,
            working: None,
            composited: None,
            display: None,
            overlay: None,
            preset,
            params: preset.effects,
            viewport: config.viewport,
            state: EditorState::Idle,
            busy: false,
            debounce: Debouncer::new(config.debounce()),
            grace: GraceTimer::new(config.grace()),
            run_pending: false,
            in_flight: None,
            tx,
            rx,
            stats: EditorStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Busy indicator: set when a run starts, cleared one grace delay after it is applied.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    pub fn preset(&self) -> &'static FilterPreset {
        self.preset
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Unfiltered working buffer for the current viewport.
    pub fn working(&self) -> Option<&RgbaFrame> {
        self.working.as_deref()
    }

    /// Latest applied pipeline output, without sparkles.
    pub fn composited(&self) -> Option<&RgbaFrame> {
        self.composited.as_ref()
    }

    /// What the user sees: composited output plus the current sparkle frame.
    pub fn display(&self) -> Option<&RgbaFrame> {
        self.display.as_ref()
    }

    pub fn overlay(&self) -> Option<&SparkleOverlay> {
        self.overlay.as_ref()
    }

    pub fn stats(&self) -> EditorStats {
        self.stats
    }

    pub fn has_pending_request(&self) -> bool {
        self.debounce.is_pending() || self.run_pending
    }

    pub fn is_run_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Accept a new source image.
    ///
    /// Non-image input is ignored. A decode failure is returned and leaves every piece of editor
    /// state as it was.
    pub fn upload(
        &mut self,
        mime: &str,
        bytes: &[u8],
        now: Instant,
    ) -> RetroResult<UploadOutcome> {
        if !is_image_mime(mime) || sniff_format(bytes).is_none() {
            tracing::warn!(mime, len = bytes.len(), "ignoring non-image upload");
            return Ok(UploadOutcome::Ignored);
        }
        let source = match SourceImage::decode(bytes) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "upload failed to decode");
                return Err(e);
            }
        };
        let working = source.working_copy(self.viewport)?;

        self.teardown();
        let (width, height) = (source.width(), source.height());
        self.source = Some(source);
        self.working = Some(Arc::new(working));
        self.set_state(EditorState::Loading);
        self.request(now);
        Ok(UploadOutcome::Accepted { width, height })
    }

    /// Replace the working parameters with a preset's.
    pub fn select_preset(&mut self, id: &str, now: Instant) -> RetroResult<()> {
        let preset = find_preset(id)
            .ok_or_else(|| RetroError::validation(format!("unknown preset '{id}'")))?;
        self.preset = preset;
        self.params = preset.effects;
        self.request(now);
        Ok(())
    }

    /// Change one parameter of the working state.
    pub fn edit(&mut self, key: EffectKey, value: EffectValue, now: Instant) -> RetroResult<()> {
        self.params = apply_edit(&self.params, key, value)?;
        self.request(now);
        Ok(())
    }

    /// Replace the whole working parameter set.
    pub fn set_params(&mut self, params: EffectParameters, now: Instant) {
        self.params = params;
        self.request(now);
    }

    /// Report the viewport class; a change rebuilds the working buffer.
    pub fn set_viewport(&mut self, viewport: ViewportClass, now: Instant) -> RetroResult<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        if let Some(source) = &self.source {
            self.working = Some(Arc::new(source.working_copy(viewport)?));
        }
        self.viewport = viewport;
        if let Some(overlay) = &mut self.overlay {
            overlay.set_frame_interval(viewport.frame_interval());
        }
        self.request(now);
        Ok(())
    }

    fn request(&mut self, now: Instant) {
        if self.working.is_none() {
            return;
        }
        let generation = self.debounce.schedule(now);
        // The re-armed timer now owns the request; an earlier fired one is superseded.
        self.run_pending = false;
        tracing::debug!(generation, "run requested");
    }

    /// Drive the editor: collect finished runs, fire due timers and advance the animation.
    pub fn poll(&mut self, now: Instant) -> RetroResult<PollOutcome> {
        let mut outcome = PollOutcome::default();
        let collected = self.collect(now, &mut outcome);

        if self.debounce.is_due(now) {
            self.debounce.take();
            self.run_pending = true;
        }
        if self.run_pending && self.in_flight.is_none() {
            self.run_pending = false;
            self.start_run()?;
            outcome.run_started = true;
        }

        if self.grace.fire(now) {
            self.busy = false;
            outcome.busy_cleared = true;
        }

        if let (Some(overlay), Some(composited)) = (&mut self.overlay, &self.composited)
            && overlay.tick(now)
        {
            let mut display = composited.clone();
            overlay.render(&mut display);
            self.display = Some(display);
            self.stats.frames_drawn += 1;
            outcome.frame_drawn = true;
        }

        collected.map(|()| outcome)
    }

    /// Fire any pending request immediately and block until the resulting run is applied.
    pub fn settle(&mut self, now: Instant) -> RetroResult<PollOutcome> {
        let mut outcome = PollOutcome::default();
        if self.debounce.take().is_some() {
            self.run_pending = true;
        }
        loop {
            if let Some(in_flight) = self.in_flight.take() {
                if let Err(e) = join_run(in_flight) {
                    self.abandon_run();
                    return Err(e);
                }
                self.collect(now, &mut outcome)?;
                continue;
            }
            if self.run_pending && self.working.is_some() {
                self.run_pending = false;
                self.start_run()?;
                outcome.run_started = true;
                continue;
            }
            break;
        }
        self.run_pending = false;
        Ok(outcome)
    }

    /// Encode what is currently displayed.
    pub fn export(&self) -> RetroResult<ExportedImage> {
        let display = self
            .display
            .as_ref()
            .ok_or_else(|| RetroError::validation("nothing to export yet"))?;
        export_jpeg(
            display,
            self.preset,
            self.config.jpeg_quality,
            self.config.export_max_dim,
        )
    }

    /// Drop the image and cancel all timers and animation. Idempotent.
    pub fn close(&mut self) {
        self.teardown();
        self.source = None;
        self.working = None;
        self.set_state(EditorState::Idle);
    }

    fn teardown(&mut self) {
        // Cancelling bumps the generation, so anything still in flight comes back stale.
        self.debounce.cancel();
        self.grace.cancel();
        self.run_pending = false;
        self.busy = false;
        if let Some(mut overlay) = self.overlay.take() {
            overlay.stop();
        }
        self.composited = None;
        self.display = None;
    }

    fn set_state(&mut self, state: EditorState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "editor state");
            self.state = state;
        }
    }

    fn abandon_run(&mut self) {
        self.busy = false;
        let fallback = if self.display.is_some() {
            EditorState::Ready
        } else {
            EditorState::Loading
        };
        self.set_state(fallback);
    }

    fn start_run(&mut self) -> RetroResult<()> {
        let Some(working) = self.working.clone() else {
            return Ok(());
        };
        let generation = self.debounce.generation();
        let params = self.params;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();

        let handle = std::thread::Builder::new()
            .name("retrofx-run".to_string())
            .spawn(move || {
                let result = pipeline.run(&working, &params, seed);
                // Fails only once the editor (and its receiver) is gone.
                let _ = tx.send(RunMsg {
                    generation,
                    seed,
                    result,
                });
            })
            .context("spawn pipeline run thread")?;

        self.in_flight = Some(InFlight { generation, handle });
        self.busy = true;
        self.grace.cancel();
        self.stats.runs_started += 1;
        self.set_state(EditorState::Processing);
        tracing::debug!(generation, "run started");
        Ok(())
    }

    /// Drain finished runs. Errors are reported after the channel is empty.
    fn collect(&mut self, now: Instant, outcome: &mut PollOutcome) -> RetroResult<()> {
        let mut failure = None;
        loop {
            while let Ok(msg) = self.rx.try_recv() {
                if let Err(e) = self.receive(msg, now, outcome) {
                    failure.get_or_insert(e);
                }
            }
            // A cleanly joined run has already queued its message; drain once more.
            let Some(in_flight) = self.in_flight.take_if(|f| f.handle.is_finished()) else {
                break;
            };
            if let Err(e) = join_run(in_flight) {
                self.abandon_run();
                failure.get_or_insert(e);
                break;
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn receive(
        &mut self,
        msg: RunMsg,
        now: Instant,
        outcome: &mut PollOutcome,
    ) -> RetroResult<()> {
        if let Some(in_flight) = self.in_flight.take_if(|f| f.generation == msg.generation) {
            join_run(in_flight)?;
        }
        if msg.generation != self.debounce.generation() || self.working.is_none() {
            tracing::debug!(generation = msg.generation, "discarding stale run");
            self.stats.runs_discarded += 1;
            outcome.runs_discarded += 1;
            return Ok(());
        }

        let output = match msg.result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "pipeline run failed");
                self.abandon_run();
                return Err(e);
            }
        };

        if let Some(mut old) = self.overlay.take() {
            old.stop();
        }
        let spec = output.sparkle;
        let mut overlay = SparkleOverlay::new(
            spec.width,
            spec.height,
            spec.intensity,
            msg.seed,
            FramePacer::new(self.viewport.frame_interval()),
        );
        overlay.start();

        let mut display = output.frame.clone();
        overlay.render(&mut display);
        self.composited = Some(output.frame);
        self.display = Some(display);
        self.overlay = Some(overlay);

        self.grace.arm(now);
        self.stats.runs_applied += 1;
        outcome.run_applied = true;
        self.set_state(EditorState::Ready);
        tracing::debug!(generation = msg.generation, "run applied");
        Ok(())
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.close();
    }
}

fn join_run(in_flight: InFlight) -> RetroResult<()> {
    in_flight
        .handle
        .join()
        .map_err(|_| RetroError::evaluation("pipeline run thread panicked"))
}

#[cfg(test)]
#[path = "../../tests/unit/editor/orchestrator.rs"]
mod tests;
