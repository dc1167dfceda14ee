//! Escape-time renderer.
//!
//! Pipeline per pixel: plane transform → escape-time iteration → colorize.
//! Rows are interleaved across a fixed rayon pool: worker `i` of `n` owns rows
//! `i, i + n, i + 2n, …` and writes them through disjoint `&mut` slices of the
//! output image, so the per-pixel loop needs no synchronization.

use image::Rgb;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::error::{ExplorerError, Result};
use crate::pixels::{PixelBuffer, CHANNELS};
use crate::viewport::ViewState;

/// Squared escape radius.
const BAILOUT: f64 = 4.0;

/// Color peaks of the R, G and B channels on the normalized iteration axis.
const CHANNEL_PEAKS: [f64; 3] = [0.9, 0.3, 0.6];

/// Largest accepted width or height, in pixels.
pub const MAX_FRAME_DIMENSION: u32 = 16_384;

// ------------------------- Request -------------------------

/// Output dimensions and iteration cap. All three are non-zero and each side
/// is at most [`MAX_FRAME_DIMENSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    width: u32,
    height: u32,
    max_iterations: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExplorerError::EmptyFrame { width, height });
        }
        if width > MAX_FRAME_DIMENSION || height > MAX_FRAME_DIMENSION {
            return Err(ExplorerError::FrameTooLarge {
                width,
                height,
                max: MAX_FRAME_DIMENSION,
            });
        }
        if max_iterations == 0 {
            return Err(ExplorerError::NoIterations);
        }
        Ok(Self {
            width,
            height,
            max_iterations,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

/// Everything one render call needs, copied by value into every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub frame: FrameSize,
    pub view: ViewState,
}

impl RenderRequest {
    pub fn new(frame: FrameSize, view: ViewState) -> Self {
        Self { frame, view }
    }

    /// Map pixel `(x, y)` to the complex plane.
    ///
    /// Both axes are scaled by the frame *width*; the vertical extent picks up
    /// the aspect ratio through `size_y` instead.
    pub fn plane_point(&self, x: u32, y: u32) -> (f64, f64) {
        let width = self.frame.width as f64;
        let height = self.frame.height as f64;

        let normal_x = x as f64 / width * 2.0 - 1.0;
        let normal_y = y as f64 / height * 2.0 - 1.0;

        let size_x = 2.0 / self.view.zoom;
        let size_y = size_x * (height / width);

        let cx = normal_x * (size_x / width) + self.view.center_x;
        let cy = normal_y * (size_y / width) + self.view.center_y;
        (cx, cy)
    }
}

// ------------------------- Iteration & color -------------------------

/// Iterations of `z ← z² + c` from `z = 0` before `|z|² ≥ 4`, capped at
/// `max_iterations`.
pub fn escape_time(cx: f64, cy: f64, max_iterations: u32) -> u32 {
    let mut zx = 0.0f64;
    let mut zy = 0.0f64;
    let mut i = 0u32;
    while zx * zx + zy * zy < BAILOUT && i < max_iterations {
        let new_x = zx * zx - zy * zy + cx;
        zy = 2.0 * zx * zy + cy;
        zx = new_x;
        i += 1;
    }
    i
}

/// How a raw channel value above 255 is narrowed to a byte.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    /// Truncate to an integer and keep the low 8 bits (banded look).
    #[default]
    Wrap,
    /// Clamp to 255.
    Saturate,
}

impl ChannelMode {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelMode::Wrap => "Wrap",
            ChannelMode::Saturate => "Saturate",
        }
    }
}

/// Color for an iteration count. Points that never escaped are black.
pub fn colorize(iterations: u32, max_iterations: u32, mode: ChannelMode) -> Rgb<u8> {
    if iterations >= max_iterations {
        return Rgb([0, 0, 0]);
    }
    let t = iterations as f64 / max_iterations as f64;
    Rgb(CHANNEL_PEAKS.map(|peak| channel(peak, t, mode)))
}

fn channel(peak: f64, t: f64, mode: ChannelMode) -> u8 {
    let distance = (peak - t).abs();
    if distance < f64::EPSILON {
        return u8::MAX;
    }
    let raw = (1.0 / distance) * 255.0;
    if !raw.is_finite() || raw > i32::MAX as f64 {
        return u8::MAX;
    }
    match mode {
        ChannelMode::Wrap => (raw as u32 & 0xFF) as u8,
        ChannelMode::Saturate => raw.min(u8::MAX as f64) as u8,
    }
}

fn render_row(request: &RenderRequest, mode: ChannelMode, y: u32, row: &mut [u8]) {
    let max_iterations = request.frame.max_iterations;
    for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
        let (cx, cy) = request.plane_point(x as u32, y);
        let iterations = escape_time(cx, cy, max_iterations);
        px.copy_from_slice(&colorize(iterations, max_iterations, mode).0);
    }
}

// ------------------------- Engine -------------------------

pub struct FractalEngine {
    pool: ThreadPool,
    workers: usize,
    channel_mode: ChannelMode,
}

impl FractalEngine {
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        settings.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.workers)
            .thread_name(|i| format!("mandel-worker-{i}"))
            .build()?;
        log::debug!(
            "engine ready: {} workers, {} channels",
            settings.workers,
            settings.channel_mode.label()
        );
        Ok(Self {
            pool,
            workers: settings.workers,
            channel_mode: settings.channel_mode,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    /// Render a full frame. Blocks until every row band is done.
    pub fn render(&self, request: &RenderRequest) -> PixelBuffer {
        let mut pixels = PixelBuffer::blank(request.frame.width, request.frame.height);

        let mut bands: Vec<Vec<(u32, &mut [u8])>> =
            (0..self.workers).map(|_| Vec::new()).collect();
        for (y, row) in pixels.rows_mut().enumerate() {
            bands[y % self.workers].push((y as u32, row));
        }

        let mode = self.channel_mode;
        let request = *request;
        self.pool.scope(|s| {
            for band in bands.into_iter().filter(|band| !band.is_empty()) {
                s.spawn(move |_| {
                    for (y, row) in band {
                        render_row(&request, mode, y, row);
                    }
                });
            }
        });

        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: u32, height: u32, max_iterations: u32, view: ViewState) -> RenderRequest {
        RenderRequest::new(FrameSize::new(width, height, max_iterations).unwrap(), view)
    }

    fn home_view() -> ViewState {
        ViewState {
            center_x: -0.5,
            center_y: 0.0,
            zoom: 0.0007,
        }
    }

    #[test]
    fn frame_size_rejects_zero_values() {
        assert!(matches!(
            FrameSize::new(0, 10, 10),
            Err(ExplorerError::EmptyFrame { width: 0, height: 10 })
        ));
        assert!(matches!(
            FrameSize::new(10, 0, 10),
            Err(ExplorerError::EmptyFrame { .. })
        ));
        assert!(matches!(FrameSize::new(10, 10, 0), Err(ExplorerError::NoIterations)));
    }

    #[test]
    fn frame_size_rejects_oversized_sides() {
        assert!(FrameSize::new(MAX_FRAME_DIMENSION, MAX_FRAME_DIMENSION, 1).is_ok());
        assert!(matches!(
            FrameSize::new(MAX_FRAME_DIMENSION + 1, 10, 10),
            Err(ExplorerError::FrameTooLarge { width, .. }) if width == MAX_FRAME_DIMENSION + 1
        ));
        assert!(matches!(
            FrameSize::new(10, u32::MAX, 10),
            Err(ExplorerError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn engine_rejects_zero_workers() {
        let settings = EngineSettings {
            workers: 0,
            ..EngineSettings::default()
        };
        assert!(matches!(FractalEngine::new(&settings), Err(ExplorerError::NoWorkers)));
    }

    #[test]
    fn engine_rejects_oversized_pool() {
        let settings = EngineSettings {
            workers: usize::MAX,
            ..EngineSettings::default()
        };
        assert!(matches!(
            FractalEngine::new(&settings),
            Err(ExplorerError::TooManyWorkers { .. })
        ));
    }

    #[test]
    fn center_pixel_maps_to_view_center() {
        let req = request(4, 4, 400, home_view());
        assert_eq!(req.plane_point(2, 2), (-0.5, 0.0));

        let req = request(
            640,
            480,
            100,
            ViewState {
                center_x: 0.25,
                center_y: -0.1,
                zoom: 3.0,
            },
        );
        let (cx, cy) = req.plane_point(320, 240);
        assert!((cx - 0.25).abs() < 1e-12);
        assert!((cy + 0.1).abs() < 1e-12);
    }

    #[test]
    fn transform_divides_both_axes_by_width() {
        let req = request(
            200,
            100,
            50,
            ViewState {
                center_x: 0.0,
                center_y: 0.0,
                zoom: 1.0,
            },
        );
        // size_x = 2, size_y = 1; corner pixel normalizes to (-1, -1)
        let (cx, cy) = req.plane_point(0, 0);
        assert!((cx + 2.0 / 200.0).abs() < 1e-15);
        assert!((cy + 1.0 / 200.0).abs() < 1e-15);
    }

    #[test]
    fn escape_time_inside_and_outside() {
        assert_eq!(escape_time(-0.5, 0.0, 400), 400);
        assert_eq!(escape_time(0.0, 0.0, 37), 37);
        assert_eq!(escape_time(-1.0, 0.0, 250), 250);
        assert_eq!(escape_time(3.0, 0.0, 400), 1);
        assert_eq!(escape_time(1.0, 0.0, 400), 2);
    }

    #[test]
    fn escape_time_respects_cap() {
        for cap in [1, 2, 10, 1000] {
            assert!(escape_time(0.3, 0.5, cap) <= cap);
        }
    }

    #[test]
    fn non_escaping_points_are_black() {
        assert_eq!(colorize(400, 400, ChannelMode::Wrap), Rgb([0, 0, 0]));
        assert_eq!(colorize(7, 7, ChannelMode::Saturate), Rgb([0, 0, 0]));
    }

    #[test]
    fn wrap_mode_keeps_low_byte_of_truncated_value() {
        // t = 1/400: raw channels 284.12, 857.14, 426.78
        assert_eq!(colorize(1, 400, ChannelMode::Wrap), Rgb([28, 89, 170]));
        // t = 0: raw channels 283.33, 850.0, 425.0
        assert_eq!(colorize(0, 400, ChannelMode::Wrap), Rgb([27, 82, 169]));
    }

    #[test]
    fn saturate_mode_clamps_to_max() {
        assert_eq!(colorize(1, 400, ChannelMode::Saturate), Rgb([255, 255, 255]));
    }

    #[test]
    fn singularities_saturate() {
        // 120 / 400 == 0.3 and 360 / 400 == 0.9 exactly
        assert_eq!(colorize(120, 400, ChannelMode::Wrap).0[1], 255);
        assert_eq!(colorize(360, 400, ChannelMode::Wrap).0[0], 255);
        assert_eq!(colorize(240, 400, ChannelMode::Wrap).0[2], 255);
    }

    #[test]
    fn render_fills_every_row() {
        let settings = EngineSettings {
            workers: 5,
            ..EngineSettings::default()
        };
        let engine = FractalEngine::new(&settings).unwrap();
        let req = request(9, 13, 60, home_view());
        let pixels = engine.render(&req);
        assert_eq!(pixels.width(), 9);
        assert_eq!(pixels.height(), 13);
        for y in 0..13 {
            for x in 0..9 {
                let (cx, cy) = req.plane_point(x, y);
                let expected = colorize(escape_time(cx, cy, 60), 60, ChannelMode::Wrap);
                assert_eq!(pixels.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn more_workers_than_rows() {
        let engine = FractalEngine::new(&EngineSettings::default()).unwrap();
        let pixels = engine.render(&request(3, 2, 20, home_view()));
        assert_eq!(pixels.as_raw().len(), 3 * 2 * CHANNELS);
    }
}
