//! Study timer: replays a recorded detector session and reports studied time.

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use study_timer::{
    app::{AppConfig, StudyTimerApp},
    config::Config,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded detector trace (YAML)
    #[arg(short, long)]
    trace: PathBuf,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Head-down threshold (nose offset / face height)
    #[arg(long)]
    threshold: Option<f64>,

    /// Studying-signal filter (none, consecutive[:n], majority[:n])
    #[arg(short, long)]
    filter: Option<String>,

    /// Display refresh rate in Hz
    #[arg(long)]
    refresh_hz: Option<u32>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Study Timer");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };

    if let Some(threshold) = args.threshold {
        config.posture.head_down_threshold = threshold;
    }
    if let Some(filter) = args.filter {
        config.filter.kind = filter;
    }
    if let Some(refresh_hz) = args.refresh_hz {
        config.display.refresh_hz = refresh_hz;
    }

    let mut app = StudyTimerApp::new(AppConfig {
        trace_path: args.trace,
        config,
    })?;
    let summary = app.run().await?;

    info!(
        "Studied {} over {} samples ({} studying, {} starts)",
        summary.elapsed, summary.ticks, summary.studying_ticks, summary.starts
    );
    println!("{}", summary.elapsed);

    Ok(())
}
