//! The sampling loop that gates the stopwatch on the studying signal.
//!
//! One logical task drives everything: each tick pulls a frame, awaits the
//! detector, reduces the result and applies it to the stopwatch before the
//! next tick is taken. Only one detection is ever in flight, so the
//! stopwatch has a single writer and needs no locking.

use crate::{
    constants::{DEFAULT_READOUT_INTERVAL_MS, DEFAULT_REFRESH_HZ},
    display::StatusSurface,
    filters::{NoFilter, StudyFilter},
    format::format_time,
    posture::PostureHeuristic,
    sensor::{Detector, FrameSource, Grab, Readiness},
    stopwatch::{Clock, Stopwatch},
    study_state::{StudyState, StudyStatus},
    Error, Result,
};
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Lifecycle of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Detector not loaded yet
    Uninitialized,
    /// Detector loaded, frame source not yet open
    AwaitingSensor,
    /// Steady state, re-entered every tick
    Sampling,
    /// Camera or model failed; the loop will not sample
    Failed,
}

/// Loop tuning
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub heuristic: PostureHeuristic,
    /// Display refresh rate; one tick per refresh at most
    pub refresh_hz: u32,
    /// Maximum gap between readout updates
    pub readout_interval_ms: u64,
    /// Return from `run` once the frame source reports `Ended`
    pub stop_on_end: bool,
    /// Start the stopwatch on the first studying sample
    pub auto_start: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            heuristic: PostureHeuristic::default(),
            refresh_hz: DEFAULT_REFRESH_HZ,
            readout_interval_ms: DEFAULT_READOUT_INTERVAL_MS,
            stop_on_end: false,
            auto_start: true,
        }
    }
}

/// Stopwatch transition applied during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Paused,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Raw per-sample reduction
    pub study: StudyState,
    /// Studying decision after filtering, used to gate the stopwatch
    pub studying: bool,
    pub status: StudyStatus,
    pub readiness: Readiness,
    pub transition: Option<Transition>,
    pub elapsed_ms: u64,
}

/// Session statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub studying_ticks: u64,
    pub starts: u64,
    pub elapsed_ms: u64,
    pub elapsed: String,
}

/// Sample loop over a detector, a frame source, a status surface and a clock
pub struct SampleLoop<D, F, S, C>
where
    D: Detector,
    F: FrameSource,
    S: StatusSurface,
    C: Clock,
{
    config: LoopConfig,
    detector: D,
    source: F,
    display: S,
    stopwatch: Stopwatch<C>,
    filter: Box<dyn StudyFilter>,
    state: LoopState,
    /// Set when the loop itself paused the stopwatch and may restart it
    paused_by_reducer: bool,
    last_status: Option<StudyStatus>,
    last_readout_ms: u64,
    ticks: u64,
    studying_ticks: u64,
}

impl<D, F, S, C> SampleLoop<D, F, S, C>
where
    D: Detector,
    F: FrameSource,
    S: StatusSurface,
    C: Clock,
{
    /// Create an uninitialized loop with no filtering
    pub fn new(config: LoopConfig, detector: D, source: F, display: S, clock: C) -> Self {
        let paused_by_reducer = config.auto_start;
        Self {
            config,
            detector,
            source,
            display,
            stopwatch: Stopwatch::new(clock),
            filter: Box::new(NoFilter),
            state: LoopState::Uninitialized,
            paused_by_reducer,
            last_status: None,
            last_readout_ms: 0,
            ticks: 0,
            studying_ticks: 0,
        }
    }

    /// Replace the studying-signal filter
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn StudyFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Load the detector and open the frame source.
    ///
    /// # Errors
    ///
    /// Returns the model or sensor error; the loop is left in
    /// [`LoopState::Failed`] and the status shows the error
    pub async fn initialize(&mut self) -> Result<()> {
        if self.state != LoopState::Uninitialized {
            return Err(Error::InvalidInput(format!("Loop already initialized ({:?})", self.state)));
        }

        self.set_status(StudyStatus::Loading);
        self.push_readout();

        info!("Loading detector '{}'", self.detector.name());
        if let Err(e) = self.detector.load().await {
            return Err(self.fail(e));
        }
        self.state = LoopState::AwaitingSensor;

        info!("Opening frame source");
        if let Err(e) = self.source.open().await {
            return Err(self.fail(e));
        }
        self.state = LoopState::Sampling;
        self.set_status(StudyStatus::Ready);
        info!("Sampling started");
        Ok(())
    }

    /// Run one sample: grab, detect, reduce, apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is not sampling or the sensor was lost.
    /// Per-sample detection failures are not errors.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        if self.state != LoopState::Sampling {
            return Err(Error::InvalidInput(format!("Cannot sample in state {:?}", self.state)));
        }

        let (study, readiness) = match self.source.grab() {
            Ok(Grab::Frame(frame)) => {
                let detection = match self.detector.detect(&frame).await {
                    Ok(detection) => detection,
                    Err(e) if e.is_fatal() => return Err(self.fail(e)),
                    Err(e) => {
                        warn!("Detection failed on frame {}: {}", frame.sequence, e);
                        None
                    }
                };
                (StudyState::reduce(&detection, &self.config.heuristic), Readiness::Playing)
            }
            Ok(Grab::Unavailable(readiness)) => (StudyState::ABSENT, readiness),
            Err(e) if e.is_fatal() => return Err(self.fail(e)),
            Err(e) => {
                warn!("Frame grab failed: {}", e);
                (StudyState::ABSENT, Readiness::Playing)
            }
        };

        // Filters smooth posture flicker only; a source that went away stops the clock now
        let studying = if readiness == Readiness::Playing {
            self.filter.apply(study.studying)
        } else {
            self.filter.reset();
            false
        };
        let transition = self.apply(studying);

        let status = if readiness == Readiness::Playing {
            study.status()
        } else {
            StudyStatus::SourcePaused
        };
        self.set_status(status);

        self.ticks += 1;
        if studying {
            self.studying_ticks += 1;
        }

        let now = self.stopwatch.clock().now_ms();
        if transition.is_some() || now.saturating_sub(self.last_readout_ms) >= self.config.readout_interval_ms {
            self.push_readout();
        }

        let elapsed_ms = self.stopwatch.current_elapsed();
        debug!(
            "tick {}: present={} head_down={} studying={} elapsed={}ms",
            self.ticks, study.present, study.head_down, studying, elapsed_ms
        );

        Ok(TickOutcome {
            study,
            studying,
            status,
            readiness,
            transition,
            elapsed_ms,
        })
    }

    /// Initialize if needed, then tick at the display refresh rate.
    ///
    /// A slow detector stretches the tick period instead of queueing ticks.
    /// Returns only on a fatal error or, with `stop_on_end`, when the frame
    /// source ends.
    ///
    /// # Errors
    ///
    /// Returns initialization errors and sensor loss
    pub async fn run(&mut self) -> Result<LoopSummary> {
        if self.state == LoopState::Uninitialized {
            self.initialize().await?;
        }

        let period = Duration::from_secs_f64(1.0 / f64::from(self.config.refresh_hz.max(1)));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = self.tick().await?;
            if self.config.stop_on_end && outcome.readiness == Readiness::Ended {
                info!("Frame source ended");
                break;
            }
        }

        self.push_readout();
        Ok(self.summary())
    }

    /// Pause on behalf of the user; studying samples will not restart it
    pub fn hold(&mut self) {
        self.paused_by_reducer = false;
        if self.stopwatch.pause() {
            self.push_readout();
        }
        info!("Stopwatch held by user");
    }

    /// Let studying samples start the stopwatch again
    pub fn release(&mut self) {
        if !self.stopwatch.is_running() {
            self.paused_by_reducer = true;
        }
        info!("Stopwatch released to posture control");
    }

    /// Zero the elapsed time
    pub fn reset(&mut self) {
        self.stopwatch.reset();
        self.push_readout();
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn stopwatch(&self) -> &Stopwatch<C> {
        &self.stopwatch
    }

    #[must_use]
    pub fn display(&self) -> &S {
        &self.display
    }

    #[must_use]
    pub fn summary(&self) -> LoopSummary {
        let elapsed_ms = self.stopwatch.current_elapsed();
        LoopSummary {
            ticks: self.ticks,
            studying_ticks: self.studying_ticks,
            starts: self.stopwatch.start_count(),
            elapsed_ms,
            elapsed: format_time(elapsed_ms),
        }
    }

    fn apply(&mut self, studying: bool) -> Option<Transition> {
        if studying && self.paused_by_reducer {
            self.paused_by_reducer = false;
            return self.stopwatch.start().then_some(Transition::Started);
        }
        if !studying && self.stopwatch.is_running() {
            self.paused_by_reducer = true;
            return self.stopwatch.pause().then_some(Transition::Paused);
        }
        None
    }

    fn fail(&mut self, e: Error) -> Error {
        error!("Monitoring stopped: {}", e);
        self.stopwatch.pause();
        self.paused_by_reducer = false;
        self.state = LoopState::Failed;
        self.set_status(StudyStatus::SensorError);
        self.push_readout();
        e
    }

    fn set_status(&mut self, status: StudyStatus) {
        if self.last_status != Some(status) {
            debug!("Status -> {}", status);
        }
        self.last_status = Some(status);
        self.display.show_status(status.text(), status.style());
    }

    fn push_readout(&mut self) {
        self.last_readout_ms = self.stopwatch.clock().now_ms();
        let readout = format_time(self.stopwatch.current_elapsed());
        self.display.show_elapsed(&readout);
    }
}
