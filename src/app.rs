//! Main application module: replays a recorded session through the sample loop.

use crate::{
    config::Config,
    display::LogDisplay,
    error::Result,
    replay::{load_trace, replay, ReplayDetector, ReplaySource},
    sample_loop::{LoopSummary, SampleLoop},
    stopwatch::ManualClock,
};
use log::info;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Recorded detector trace to replay
    pub trace_path: PathBuf,
    /// Loop, filter and display settings
    pub config: Config,
}

/// Main application struct
pub struct StudyTimerApp {
    sample_loop: SampleLoop<ReplayDetector, ReplaySource, LogDisplay, ManualClock>,
}

impl StudyTimerApp {
    /// Create a new study timer application
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the trace cannot be loaded
    pub fn new(app_config: AppConfig) -> Result<Self> {
        info!("Initializing study timer");
        app_config.config.validate()?;

        let trace = load_trace(&app_config.trace_path)?;
        info!(
            "Trace has {} samples over {} ms ({}x{})",
            trace.samples.len(),
            trace.duration_ms(),
            trace.width,
            trace.height
        );

        let start_ms = trace.samples.first().map_or(0, |s| s.at_ms);
        let clock = ManualClock::new(start_ms);
        let (source, detector) = replay(trace, clock.clone());

        let filter = app_config.config.create_filter()?;
        info!("Using {}", filter.name());

        let sample_loop = SampleLoop::new(
            app_config.config.loop_config()?,
            detector,
            source,
            LogDisplay::new(),
            clock,
        )
        .with_filter(filter);

        Ok(Self { sample_loop })
    }

    /// Run until the trace ends or Ctrl-C is pressed
    ///
    /// # Errors
    ///
    /// Returns camera and model failures
    pub async fn run(&mut self) -> Result<LoopSummary> {
        info!("Starting sample loop");

        let finished = tokio::select! {
            res = self.sample_loop.run() => Some(res),
            _ = tokio::signal::ctrl_c() => None,
        };

        match finished {
            Some(res) => res,
            None => {
                info!("Interrupted by user");
                Ok(self.sample_loop.summary())
            }
        }
    }
}
