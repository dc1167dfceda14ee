//! Interactive window: held keys drive the viewport, every frame is re-rendered
//! and shown under a small info tab.

use eframe::{egui, App};
use egui::{pos2, Color32, ColorImage, Key, RichText, TextureHandle, TextureOptions, Vec2};

use crate::config::ExplorerConfig;
use crate::engine::{FractalEngine, FrameSize, RenderRequest};
use crate::error::{ExplorerError, Result};
use crate::hud::{info_text, FpsCounter};
use crate::intent::{apply_all, Intent};
use crate::viewport::{Direction, Viewport};

const KEY_BINDINGS: [(Key, Intent); 7] = [
    (Key::W, Intent::Pan(Direction::Up)),
    (Key::S, Intent::Pan(Direction::Down)),
    (Key::A, Intent::Pan(Direction::Left)),
    (Key::D, Intent::Pan(Direction::Right)),
    (Key::ArrowUp, Intent::ZoomIn),
    (Key::ArrowDown, Intent::ZoomOut),
    (Key::R, Intent::Reset),
];

const INFO_TAB_FILL: Color32 = Color32::from_rgb(0, 200, 0);

struct ExplorerApp {
    viewport: Viewport,
    engine: FractalEngine,
    frame: FrameSize,
    tex: Option<TextureHandle>,
    fps: FpsCounter,
}

impl App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let held: Vec<Intent> = ctx.input(|i| {
            KEY_BINDINGS
                .iter()
                .filter(|(key, _)| i.key_down(*key))
                .map(|(_, intent)| *intent)
                .collect()
        });
        apply_all(&mut self.viewport, &held);

        let request = RenderRequest::new(self.frame, self.viewport.view());
        let pixels = self.engine.render(&request);
        let size = [pixels.width() as usize, pixels.height() as usize];
        let color_image = ColorImage::from_rgb(size, pixels.as_raw());
        let tex = self.tex.get_or_insert_with(|| {
            ctx.load_texture("mandelbrot", color_image.clone(), TextureOptions::NEAREST)
        });
        tex.set(color_image, TextureOptions::NEAREST);

        let fps = self.fps.tick();
        let display = Vec2::new(size[0] as f32, size[1] as f32);
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.image((tex.id(), display));
            });

        egui::Area::new(egui::Id::new("info_tab"))
            .fixed_pos(pos2(10.0, 10.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(INFO_TAB_FILL)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(info_text(&self.viewport.readout(), fps))
                                .monospace()
                                .size(16.0)
                                .color(Color32::BLACK),
                        );
                    });
            });

        ctx.request_repaint();
    }
}

/// Open the window and block until it closes.
pub fn run(config: &ExplorerConfig) -> Result<()> {
    let frame = config.frame.frame_size()?;
    let viewport = Viewport::new(config.viewport.clone())?;
    let engine = FractalEngine::new(&config.engine)?;
    log::info!(
        "opening {}x{} viewer, {} iterations, {} workers",
        frame.width(),
        frame.height(),
        frame.max_iterations(),
        engine.workers()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([frame.width() as f32, frame.height() as f32])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "Mandelbrot Set",
        options,
        Box::new(move |_cc| {
            Box::new(ExplorerApp {
                viewport,
                engine,
                frame,
                tex: None,
                fps: FpsCounter::new(),
            })
        }),
    )
    .map_err(|e| ExplorerError::Viewer(e.to_string()))
}
