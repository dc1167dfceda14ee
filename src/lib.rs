//! Mandelzoom — pannable, zoomable Mandelbrot explorer.
//! - `Viewport` owns pan/zoom state and rejects commands that leave the explorable region
//! - `FractalEngine` renders a frame on a fixed rayon pool, rows interleaved across workers
//! - `ExplorerConfig` loads every tunable from TOML or JSON
//! - optional `viewer` feature: eframe window with keyboard controls and an info overlay

pub mod config;
pub mod engine;
pub mod error;
pub mod hud;
pub mod intent;
pub mod pixels;
pub mod viewport;

#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::{EngineSettings, ExplorerConfig, FrameSettings, ViewportSettings};
pub use engine::{ChannelMode, FractalEngine, FrameSize, RenderRequest};
pub use error::{ExplorerError, Result};
pub use intent::Intent;
pub use pixels::PixelBuffer;
pub use viewport::{Direction, Outcome, Readout, ViewState, Viewport};
