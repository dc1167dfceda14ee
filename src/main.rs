use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, Subcommand};

use mandelzoom::{
    hud, intent, ExplorerConfig, FractalEngine, Intent, Outcome, RenderRequest, Result, Viewport,
};

// ------------------------- CLI -------------------------

#[derive(Parser)]
#[command(name = "mandelzoom")]
#[command(about = "Pannable, zoomable Mandelbrot explorer")]
struct Args {
    /// Optional config file (.toml / .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Iteration cap per pixel
    #[arg(long, global = true)]
    max_iterations: Option<u32>,

    /// Render worker threads
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Interactive window when omitted (requires the `viewer` feature)
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render one frame headlessly to a PNG
    Render {
        /// Output image
        #[arg(short, long, default_value = "mandelbrot.png")]
        out: PathBuf,

        /// Key script replayed before rendering: wasd pan, +/- zoom, r reset,
        /// a leading count repeats a key (e.g. "40+ 5d")
        #[arg(short, long, default_value = "")]
        keys: String,

        /// Start the view at this center instead of the home position
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        center: Option<Vec<f64>>,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Open the interactive window
    #[cfg(feature = "viewer")]
    View,
}

// ------------------------- Commands -------------------------

fn load_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(width) = args.width {
        config.frame.width = width;
    }
    if let Some(height) = args.height {
        config.frame.height = height;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.frame.max_iterations = max_iterations;
    }
    if let Some(workers) = args.workers {
        config.engine.workers = workers;
    }
    config.validate()?;
    Ok(config)
}

fn render_headless(
    config: &ExplorerConfig,
    out: &Path,
    keys: &str,
    center: Option<&[f64]>,
) -> Result<()> {
    let script = Intent::parse_script(keys)?;
    let mut viewport = Viewport::new(config.viewport.clone())?;
    if let Some(&[x, y]) = center {
        if viewport.jump_to(x, y) == Outcome::Rejected {
            log::warn!("center ({x}, {y}) is outside the explorable region, keeping home");
        }
    }
    let rejected = intent::apply_all(&mut viewport, &script);
    if rejected > 0 {
        log::info!("{rejected} of {} intents rejected", script.len());
    }

    let engine = FractalEngine::new(&config.engine)?;
    let request = RenderRequest::new(config.frame.frame_size()?, viewport.view());
    let started = Instant::now();
    let pixels = engine.render(&request);
    log::info!(
        "rendered {}x{} ({} iterations) on {} workers in {:.1?}",
        pixels.width(),
        pixels.height(),
        request.frame.max_iterations(),
        engine.workers(),
        started.elapsed()
    );
    pixels.save_png(out)?;
    println!("{}", hud::readout_text(&viewport.readout()));
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    match args.cmd {
        Some(Cmd::Render { out, keys, center }) => {
            render_headless(&config, &out, &keys, center.as_deref())
        }
        Some(Cmd::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        #[cfg(feature = "viewer")]
        Some(Cmd::View) | None => mandelzoom::viewer::run(&config),
        #[cfg(not(feature = "viewer"))]
        None => Err(mandelzoom::ExplorerError::ViewerUnavailable),
    }
}

// ------------------------- Entry -------------------------

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
