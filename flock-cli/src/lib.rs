use anyhow::{Context, Result};
use clap::Parser;
use flock_core::{Bounds, FlockController, FlockSettings, FlockStatus};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless flocking simulation", long_about = None)]
pub struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 500)]
    pub frames: u64,

    /// Width of the simulation area
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Height of the simulation area
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// RNG seed for spawn positions (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON settings file; missing fields keep their defaults
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Initial blue birds (overrides the settings file)
    #[arg(long)]
    pub blue: Option<usize>,

    /// Initial green birds (overrides the settings file)
    #[arg(long)]
    pub green: Option<usize>,

    /// Initial predators (overrides the settings file)
    #[arg(long)]
    pub predators: Option<usize>,

    /// Initial obstacles (overrides the settings file)
    #[arg(long)]
    pub obstacles: Option<usize>,

    /// Log a status line every N frames, 0 to disable
    #[arg(long, default_value_t = 50)]
    pub report_every: u64,

    /// Milliseconds per frame; 0 runs as fast as possible
    #[arg(long, default_value_t = 0)]
    pub interval_ms: u64,

    /// Print the final status as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

/// Reads the settings file, if any, and applies count overrides from the command line.
pub fn load_settings(args: &Args) -> Result<FlockSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            FlockSettings::from_json(&json)
                .with_context(|| format!("Invalid settings file {}", path.display()))?
        }
        None => FlockSettings::default(),
    };

    if let Some(blue) = args.blue {
        settings.initial.blue = blue;
    }
    if let Some(green) = args.green {
        settings.initial.green = green;
    }
    if let Some(predators) = args.predators {
        settings.initial.predators = predators;
    }
    if let Some(obstacles) = args.obstacles {
        settings.initial.obstacles = obstacles;
    }

    Ok(settings)
}

/// Runs the simulation to completion and returns the final status.
///
/// Stops early once no agents are left.
pub fn run(args: &Args) -> Result<FlockStatus> {
    if !args.bounds().has_area() {
        anyhow::bail!(
            "Simulation area must be finite and positive, got {}x{}",
            args.width,
            args.height
        );
    }

    let settings = load_settings(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {}", seed);

    let bounds = args.bounds();
    let mut controller = FlockController::new(settings, seed);
    controller.reset(bounds);

    let interval = Duration::from_millis(args.interval_ms);
    let started = Instant::now();

    while controller.frame() < args.frames {
        let frame_start = Instant::now();
        controller.tick(bounds);

        let status = controller.status();
        if args.report_every > 0 && status.frame % args.report_every == 0 {
            log::info!(
                "frame {}: {} blue, {} green, {} predators, {} obstacles",
                status.frame,
                status.blue,
                status.green,
                status.predators,
                status.obstacles
            );
        }

        if controller.flock().is_empty() {
            log::info!("Flock is empty after {} frames", status.frame);
            break;
        }

        if let Some(remaining) = interval.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        log::debug!(
            "{} frames in {:.2}s ({:.1} fps)",
            controller.frame(),
            elapsed,
            controller.frame() as f64 / elapsed
        );
    }

    Ok(controller.status())
}
