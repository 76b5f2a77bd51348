//! Posture-gated study stopwatch.
//!
//! Judges from facial landmarks whether a person is studying (present with
//! the head bowed toward the desk) and lets a stopwatch accrue time only
//! while they are:
//! - a 2D head-down heuristic over the 68-point landmark layout
//! - a per-sample reducer turning detector output into a studying decision
//! - a drift-free stopwatch accumulator
//! - an async sample loop tying them to a camera, a detector and a display
//!
//! The detector and camera are external; they plug in through the traits in
//! [`sensor`]. [`replay`] provides a recorded-trace backend.
//!
//! # Examples
//!
//! ## Posture and stopwatch
//!
//! ```
//! use study_timer::{
//!     landmarks::{FaceBox, FaceLandmarks, Point},
//!     posture::PostureHeuristic,
//!     stopwatch::{ManualClock, Stopwatch},
//!     study_state::StudyState,
//!     format::format_time,
//! };
//!
//! let mut points = vec![Point::new(0.0, 40.0); 68];
//! points[30] = Point::new(0.0, 70.0); // nose tip well below the eyes
//! let landmarks = FaceLandmarks::new(points);
//! let face = FaceBox::new(0.0, 0.0, 100.0, 100.0);
//!
//! let heuristic = PostureHeuristic::default();
//! let head_down = heuristic.is_head_down(&landmarks, Some(&face));
//! let state = StudyState::from_parts(true, head_down);
//! assert!(state.studying);
//!
//! let clock = ManualClock::new(0);
//! let mut stopwatch = Stopwatch::new(clock.clone());
//! stopwatch.start();
//! clock.advance(3_661_000);
//! assert_eq!(format_time(stopwatch.current_elapsed()), "01:01:01");
//! ```
//!
//! ## Replaying a recorded session
//!
//! ```no_run
//! use study_timer::{
//!     display::LogDisplay,
//!     replay::{load_trace, replay},
//!     sample_loop::{LoopConfig, SampleLoop},
//!     stopwatch::ManualClock,
//! };
//!
//! # async fn demo() -> study_timer::Result<()> {
//! let clock = ManualClock::new(0);
//! let (source, detector) = replay(load_trace("session.yaml")?, clock.clone());
//! let config = LoopConfig { stop_on_end: true, ..LoopConfig::default() };
//! let mut sampler = SampleLoop::new(config, detector, source, LogDisplay::new(), clock);
//! let summary = sampler.run().await?;
//! println!("studied {}", summary.elapsed);
//! # Ok(())
//! # }
//! ```

/// Landmark topology and tunable defaults
pub mod constants;

/// Detector output types
pub mod landmarks;

/// Head-down heuristic
pub mod posture;

/// Per-sample studying decision
pub mod study_state;

/// Elapsed-time accumulator
pub mod stopwatch;

/// `HH:MM:SS` formatting
pub mod format;

/// Optional smoothing of the studying signal
pub mod filters;

/// Camera and detector seams
pub mod sensor;

/// Status surface
pub mod display;

/// Sampling state machine
pub mod sample_loop;

/// Recorded-trace backend
pub mod replay;

/// Configuration management
pub mod config;

/// Main application module
pub mod app;

/// Error types and result handling
pub mod error;

pub use error::{Error, Result};
