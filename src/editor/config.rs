use std::time::Duration;

use crate::foundation::core::ViewportClass;
use crate::foundation::error::{RetroError, RetroResult};
use crate::pixel::pass::CHUNK_SIZE;

/// Tunables for an [`Editor`](crate::Editor).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Delay before an edit triggers a pipeline run.
    pub debounce_ms: u64,
    /// Delay after a run is applied before the busy indicator clears.
    pub grace_ms: u64,
    /// Samples per pixel-pass chunk; a positive multiple of 4.
    pub chunk_size: usize,
    /// Pixel-pass workers. `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
    pub viewport: ViewportClass,
    /// Longer-edge cap applied before JPEG encoding.
    pub export_max_dim: u32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Fixed seed for grain and sparkles. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            grace_ms: 100,
            chunk_size: CHUNK_SIZE,
            threads: None,
            viewport: ViewportClass::Wide,
            export_max_dim: 1200,
            jpeg_quality: 80,
            seed: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> RetroResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| RetroError::validation(format!("invalid editor config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `RETROFX_THREADS`, `RETROFX_DEBOUNCE_MS` and `RETROFX_CHUNK_SIZE`. Unparseable or
    /// out-of-range values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = lookup("RETROFX_THREADS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.threads = Some(n);
        }
        if let Some(ms) = lookup("RETROFX_DEBOUNCE_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.debounce_ms = ms;
        }
        if let Some(n) = lookup("RETROFX_CHUNK_SIZE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0 && n.is_multiple_of(4))
        {
            self.chunk_size = n;
        }
        self
    }

    pub fn validate(&self) -> RetroResult<()> {
        if self.chunk_size == 0 || !self.chunk_size.is_multiple_of(4) {
            return Err(RetroError::validation(
                "chunk_size must be a positive multiple of 4",
            ));
        }
        if self.threads == Some(0) {
            return Err(RetroError::validation("threads must be >= 1 when set"));
        }
        if self.export_max_dim == 0 {
            return Err(RetroError::validation("export_max_dim must be >= 1"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RetroError::validation("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/config.rs"]
mod tests;
