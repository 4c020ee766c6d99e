use std::path::Path;

use crate::foundation::core::Resolution;
use crate::foundation::error::{FramepaceError, FramepaceResult};

/// Lowest accepted logical frame rate.
pub const MIN_FRAME_RATE: u32 = 1;
/// Highest accepted logical frame rate.
pub const MAX_FRAME_RATE: u32 = 1000;

/// Compatibility mode of the hosted application, which selects the default frame rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatMode {
    /// Legacy titles tick at 40 logical frames per second.
    Legacy,
    /// Current titles tick at 60 logical frames per second.
    #[default]
    Standard,
}

impl CompatMode {
    /// Default logical frame rate for this mode.
    pub fn default_frame_rate(self) -> u32 {
        match self {
            Self::Legacy => 40,
            Self::Standard => 60,
        }
    }
}

/// Host-provided screen configuration.
///
/// Every field has a default and out-of-range values are clamped by [`ScreenConfig::normalized`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Logical resolution of the main screen buffer.
    pub resolution: Resolution,
    /// Compatibility mode (selects the default frame rate).
    pub compat: CompatMode,
    /// Explicit logical frame rate; `None` uses the compat default.
    pub frame_rate: Option<u32>,
    /// Letterbox the logical buffer inside the window instead of stretching.
    pub keep_ratio: bool,
    /// Linear instead of nearest sampling when scaling to the window.
    pub smooth_scale: bool,
    /// Allow same-cycle catch-up frames to skip rendering.
    pub allow_skip_frame: bool,
    /// Bottom-left texture origin on the software device.
    pub uv_flip: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            compat: CompatMode::default(),
            frame_rate: None,
            keep_ratio: true,
            smooth_scale: false,
            allow_skip_frame: false,
            uv_flip: false,
        }
    }
}

impl ScreenConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> FramepaceResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| FramepaceError::config(format!("parse screen config: {e}")))?;
        Ok(cfg.normalized())
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FramepaceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FramepaceError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Frame rate after applying the compat default and clamping.
    pub fn effective_frame_rate(&self) -> u32 {
        clamp_frame_rate(self.frame_rate.unwrap_or(self.compat.default_frame_rate()))
    }

    /// Clamp every field into its valid range.
    pub fn normalized(mut self) -> Self {
        let res = Resolution::new(self.resolution.width, self.resolution.height);
        if res != self.resolution {
            tracing::warn!(
                width = self.resolution.width,
                height = self.resolution.height,
                "zero-sized logical resolution clamped"
            );
            self.resolution = res;
        }
        self.frame_rate = self.frame_rate.map(clamp_frame_rate);
        self
    }
}

/// Clamp a frame rate into `[MIN_FRAME_RATE, MAX_FRAME_RATE]`.
pub fn clamp_frame_rate(rate: u32) -> u32 {
    let clamped = rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
    if clamped != rate {
        tracing::warn!(requested = rate, clamped, "frame rate out of range");
    }
    clamped
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
