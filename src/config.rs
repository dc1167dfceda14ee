use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::engine::{ChannelMode, FrameSize};
use crate::error::{ExplorerError, Result};

/// Largest accepted worker pool.
pub const MAX_WORKERS: usize = 1024;

// ------------------------- Sections -------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameSettings {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_iterations: 400,
        }
    }
}

impl FrameSettings {
    pub fn frame_size(&self) -> Result<FrameSize> {
        FrameSize::new(self.width, self.height, self.max_iterations)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportSettings {
    /// Baseline magnification; zoom-out never goes below it.
    pub default_zoom: f64,
    /// Pan step at zoom 1, divided by the current zoom.
    pub move_speed: f64,
    pub zoom_factor: f64,
    /// Display-only scale for the coordinate readout.
    pub coords_mul: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            default_zoom: 0.0007,
            move_speed: 0.0001,
            zoom_factor: 1.1,
            coords_mul: 1000.0,
        }
    }
}

impl ViewportSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.default_zoom.is_finite() && self.default_zoom > 0.0) {
            return Err(ExplorerError::InvalidZoom(self.default_zoom));
        }
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            return Err(ExplorerError::InvalidZoomFactor(self.zoom_factor));
        }
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(ExplorerError::InvalidMoveSpeed(self.move_speed));
        }
        if !self.coords_mul.is_finite() {
            return Err(ExplorerError::InvalidCoordsMul(self.coords_mul));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    pub workers: usize,
    pub channel_mode: ChannelMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            workers: 12,
            channel_mode: ChannelMode::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ExplorerError::NoWorkers);
        }
        if self.workers > MAX_WORKERS {
            return Err(ExplorerError::TooManyWorkers {
                workers: self.workers,
                max: MAX_WORKERS,
            });
        }
        Ok(())
    }
}

// ------------------------- Config -------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    pub frame: FrameSettings,
    pub viewport: ViewportSettings,
    pub engine: EngineSettings,
}

impl ExplorerConfig {
    /// Load from `.toml` or `.json`; any other extension tries JSON, then TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parse_err = |message: String| ExplorerError::Config {
            path: path.to_path_buf(),
            message,
        };
        let config: Self = match path.extension().and_then(|ext| ext.to_str()).unwrap_or("") {
            "json" => serde_json::from_str(&data).map_err(|e| parse_err(e.to_string()))?,
            "toml" => toml::from_str(&data).map_err(|e| parse_err(e.to_string()))?,
            _ => serde_json::from_str(&data)
                .or_else(|_| toml::from_str(&data))
                .map_err(|e: toml::de::Error| parse_err(e.to_string()))?,
        };
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.frame.frame_size()?;
        self.viewport.validate()?;
        self.engine.validate()
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ExplorerError::Config {
            path: "<serialize>".into(),
            message: e.to_string(),
        })
    }
}
