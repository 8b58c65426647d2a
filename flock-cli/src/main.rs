use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::{run, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock simulation starting...");
    log::info!("Area: {}x{}", args.width, args.height);
    log::info!("Frames: {}", args.frames);

    let status = run(&args).context("Simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        log::info!(
            "Finished at frame {}: {} agents, {} obstacles",
            status.frame,
            status.agent_total(),
            status.obstacles
        );
    }

    Ok(())
}
