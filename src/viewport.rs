//! Pan/zoom state over the complex plane.
//!
//! Every command either applies in full or leaves the view untouched; the
//! viewport never snaps to a bound.

use crate::config::ViewportSettings;
use crate::error::Result;

/// Explorable real range for the view center.
pub const X_BOUNDS: (f64, f64) = (-2.0, 1.0);
/// Explorable imaginary range for the view center.
pub const Y_BOUNDS: (f64, f64) = (-1.5, 1.5);

const HOME_X: f64 = -0.5;
const HOME_Y: f64 = 0.0;

/// Result of a viewport command.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The command would have left the allowed range; nothing changed.
    Rejected,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

/// Mapping parameters handed to the engine for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

/// Normalized, human-readable view values for an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    settings: ViewportSettings,
    center_x: f64,
    center_y: f64,
    zoom: f64,
}

impl Viewport {
    pub fn new(settings: ViewportSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            center_x: HOME_X,
            center_y: HOME_Y,
            zoom: settings.default_zoom,
            settings,
        })
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn move_up(&mut self) -> Outcome {
        self.pan(Direction::Up)
    }

    pub fn move_down(&mut self) -> Outcome {
        self.pan(Direction::Down)
    }

    pub fn move_left(&mut self) -> Outcome {
        self.pan(Direction::Left)
    }

    pub fn move_right(&mut self) -> Outcome {
        self.pan(Direction::Right)
    }

    /// Shift the center by one step. The step shrinks as zoom grows so the
    /// on-screen speed stays roughly constant.
    pub fn pan(&mut self, direction: Direction) -> Outcome {
        let step = self.settings.move_speed / self.zoom;
        match direction {
            Direction::Up => shift_axis(&mut self.center_y, -step, Y_BOUNDS),
            Direction::Down => shift_axis(&mut self.center_y, step, Y_BOUNDS),
            Direction::Left => shift_axis(&mut self.center_x, -step, X_BOUNDS),
            Direction::Right => shift_axis(&mut self.center_x, step, X_BOUNDS),
        }
    }

    /// No fixed ceiling; past native f64 precision the image just degrades.
    /// Rejected only once the product would overflow to infinity.
    pub fn zoom_in(&mut self) -> Outcome {
        let candidate = self.zoom * self.settings.zoom_factor;
        if !candidate.is_finite() {
            return Outcome::Rejected;
        }
        self.zoom = candidate;
        Outcome::Applied
    }

    pub fn zoom_out(&mut self) -> Outcome {
        let candidate = self.zoom / self.settings.zoom_factor;
        if candidate < self.settings.default_zoom {
            return Outcome::Rejected;
        }
        self.zoom = candidate;
        Outcome::Applied
    }

    pub fn reset_view(&mut self) {
        self.center_x = HOME_X;
        self.center_y = HOME_Y;
        self.zoom = self.settings.default_zoom;
    }

    /// Place the center directly, keeping the current zoom.
    pub fn jump_to(&mut self, x: f64, y: f64) -> Outcome {
        if !within(x, X_BOUNDS) || !within(y, Y_BOUNDS) {
            return Outcome::Rejected;
        }
        self.center_x = x;
        self.center_y = y;
        Outcome::Applied
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            center_x: self.center_x,
            center_y: self.center_y,
            zoom: self.zoom,
        }
    }

    pub fn readout(&self) -> Readout {
        Readout {
            x: self.center_x * self.settings.coords_mul,
            y: self.center_y * self.settings.coords_mul,
            zoom: self.zoom / self.settings.default_zoom,
        }
    }
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

fn shift_axis(value: &mut f64, delta: f64, bounds: (f64, f64)) -> Outcome {
    let candidate = *value + delta;
    if !within(candidate, bounds) {
        return Outcome::Rejected;
    }
    *value = candidate;
    Outcome::Applied
}
