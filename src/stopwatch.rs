//! Stopwatch accumulator.
//!
//! Elapsed time is folded into `elapsed_ms` only when the stopwatch pauses;
//! while running it is derived on demand from the anchor timestamp, so the
//! readout never drifts with tick jitter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of millisecond timestamps
pub trait Clock {
    /// Current time in milliseconds since an arbitrary origin
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `Instant`, measured from creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Externally driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Jump to an absolute time. Going backwards is allowed.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Elapsed-time bookkeeping.
///
/// While running, true elapsed time at `now` is `elapsed_ms + (now - anchor)`;
/// while paused it is exactly `elapsed_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopwatchState {
    elapsed_ms: u64,
    anchor_ms: Option<u64>,
}

impl StopwatchState {
    /// Fresh, paused stopwatch at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_ms: 0,
            anchor_ms: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.anchor_ms.is_some()
    }

    /// Time folded in at the last pause
    #[must_use]
    pub fn accumulated_ms(&self) -> u64 {
        self.elapsed_ms
    }

    #[must_use]
    pub fn anchor_ms(&self) -> Option<u64> {
        self.anchor_ms
    }

    /// Running from `now`; unchanged if already running
    #[must_use]
    pub fn started(self, now_ms: u64) -> Self {
        if self.is_running() {
            return self;
        }
        Self {
            anchor_ms: Some(now_ms),
            ..self
        }
    }

    /// Paused at `now`; unchanged if already paused
    #[must_use]
    pub fn paused(self, now_ms: u64) -> Self {
        match self.anchor_ms {
            Some(anchor) => Self {
                elapsed_ms: self.elapsed_ms.saturating_add(now_ms.saturating_sub(anchor)),
                anchor_ms: None,
            },
            None => self,
        }
    }

    /// Back to zero, keeping the running flag
    #[must_use]
    pub fn reset(self, now_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            anchor_ms: self.anchor_ms.map(|_| now_ms),
        }
    }

    /// True elapsed time at `now`
    #[must_use]
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        let running = self.anchor_ms.map_or(0, |anchor| now_ms.saturating_sub(anchor));
        self.elapsed_ms.saturating_add(running)
    }
}

/// Stopwatch owning one state and the clock that drives it
#[derive(Debug)]
pub struct Stopwatch<C: Clock> {
    state: StopwatchState,
    clock: C,
    starts: u64,
}

impl<C: Clock> Stopwatch<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            state: StopwatchState::new(),
            clock,
            starts: 0,
        }
    }

    /// Start accruing time. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() {
            return false;
        }
        self.state = self.state.started(self.clock.now_ms());
        self.starts += 1;
        log::info!("Stopwatch started at {} ms accumulated", self.state.accumulated_ms());
        true
    }

    /// Suspend accrual. Returns `false` if it was already paused.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = self.state.paused(self.clock.now_ms());
        log::info!("Stopwatch paused at {} ms accumulated", self.state.accumulated_ms());
        true
    }

    pub fn reset(&mut self) {
        self.state = self.state.reset(self.clock.now_ms());
        log::info!("Stopwatch reset");
    }

    /// Elapsed time right now
    #[must_use]
    pub fn current_elapsed(&self) -> u64 {
        self.state.elapsed_at(self.clock.now_ms())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn state(&self) -> StopwatchState {
        self.state
    }

    /// Number of paused-to-running transitions so far
    #[must_use]
    pub fn start_count(&self) -> u64 {
        self.starts
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
