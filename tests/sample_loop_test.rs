//! End-to-end tests for the sample loop driving the stopwatch


use study_timer::{
    display::StatusStyle,
    filters::create_filter,
    sample_loop::{LoopConfig, LoopState, SampleLoop, Transition},
    sensor::Readiness,
    stopwatch::ManualClock,
    Error,
};
use test_helpers::{head_down, head_up, RecordingDisplay, Scripted, ScriptedDetector, ScriptedSource};

type TestLoop = SampleLoop<ScriptedDetector, ScriptedSource, RecordingDisplay, ManualClock>;

fn make_loop(detector: ScriptedDetector, source: impl FnOnce(ManualClock) -> ScriptedSource) -> TestLoop {
    make_loop_with(LoopConfig::default(), detector, source)
}

fn make_loop_with(
    config: LoopConfig,
    detector: ScriptedDetector,
    source: impl FnOnce(ManualClock) -> ScriptedSource,
) -> TestLoop {
    let clock = ManualClock::new(0);
    SampleLoop::new(config, detector, source(clock.clone()), RecordingDisplay::default(), clock)
}

fn every_100ms(clock: ManualClock) -> ScriptedSource {
    ScriptedSource::new(clock, 100)
}

#[tokio::test]
async fn test_absent_person_keeps_stopwatch_paused() {
    let mut sampler = make_loop(ScriptedDetector::new(vec![]), every_100ms);
    sampler.initialize().await.unwrap();

    for _ in 0..3 {
        let outcome = sampler.tick().await.unwrap();
        assert!(!outcome.study.present);
        assert!(outcome.transition.is_none());
        assert_eq!(outcome.elapsed_ms, 0);
    }

    assert_eq!(sampler.display().last_status(), Some("person not found"));
    assert!(!sampler.stopwatch().is_running());
    assert_eq!(sampler.stopwatch().current_elapsed(), 0);
}

#[tokio::test]
async fn test_studying_starts_exactly_once() {
    let detector = ScriptedDetector::new(vec![Scripted::Absent, Scripted::Absent]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, every_100ms);
    sampler.initialize().await.unwrap();

    let mut transitions = Vec::new();
    for _ in 0..6 {
        let outcome = sampler.tick().await.unwrap();
        transitions.extend(outcome.transition);
    }

    assert_eq!(transitions, vec![Transition::Started]);
    assert_eq!(sampler.stopwatch().start_count(), 1);
    assert!(sampler.stopwatch().is_running());
    assert_eq!(sampler.display().last_status(), Some("studying"));
    assert_eq!(sampler.display().last_style(), Some(StatusStyle::Studying));
}

#[tokio::test]
async fn test_elapsed_accrues_only_while_studying() {
    let detector = ScriptedDetector::new(vec![
        Scripted::Face(head_down()), // t=100 start
        Scripted::Face(head_down()), // t=200
        Scripted::Face(head_down()), // t=300
        Scripted::Absent,            // t=400 pause, 300 ms
        Scripted::Face(head_up()),   // t=500 distracted
        Scripted::Face(head_down()), // t=600 start
        Scripted::Absent,            // t=700 pause, +100 ms
    ]);
    let mut sampler = make_loop(detector, every_100ms);
    sampler.initialize().await.unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..7 {
        outcomes.push(sampler.tick().await.unwrap());
    }

    assert_eq!(outcomes[3].transition, Some(Transition::Paused));
    assert_eq!(outcomes[3].elapsed_ms, 300);
    assert_eq!(outcomes[4].status.text(), "distracted");
    assert!(outcomes[4].study.present && !outcomes[4].study.head_down);
    assert_eq!(outcomes[4].elapsed_ms, 300);
    assert_eq!(outcomes[5].transition, Some(Transition::Started));
    assert_eq!(sampler.stopwatch().current_elapsed(), 400);
    assert_eq!(sampler.summary().starts, 2);
    assert_eq!(sampler.summary().studying_ticks, 4);
}

#[tokio::test]
async fn test_detection_error_is_recoverable() {
    let detector = ScriptedDetector::new(vec![Scripted::Face(head_down()), Scripted::Fail, Scripted::Face(head_down())]);
    let mut sampler = make_loop(detector, every_100ms);
    sampler.initialize().await.unwrap();

    sampler.tick().await.unwrap();
    let failed = sampler.tick().await.unwrap();
    assert!(!failed.study.present);
    assert_eq!(failed.transition, Some(Transition::Paused));
    assert_eq!(sampler.display().last_status(), Some("person not found"));

    let recovered = sampler.tick().await.unwrap();
    assert_eq!(recovered.transition, Some(Transition::Started));
    assert_eq!(sampler.state(), LoopState::Sampling);
}

#[tokio::test]
async fn test_paused_source_skips_detector() {
    let detector = ScriptedDetector::new(vec![Scripted::Face(head_down()), Scripted::Face(head_down())]);
    let mut sampler = make_loop(detector, |clock| {
        ScriptedSource::new(clock, 100).with_readiness(vec![
            Readiness::Playing,
            Readiness::Paused,
            Readiness::Paused,
            Readiness::Playing,
        ])
    });
    sampler.initialize().await.unwrap();

    assert_eq!(sampler.tick().await.unwrap().transition, Some(Transition::Started));

    let paused = sampler.tick().await.unwrap();
    assert_eq!(paused.transition, Some(Transition::Paused));
    assert_eq!(paused.readiness, Readiness::Paused);
    assert_eq!(sampler.display().last_status(), Some("person not found"));
    assert_eq!(sampler.display().last_style(), Some(StatusStyle::Paused));

    sampler.tick().await.unwrap();

    // The second scripted face is still queued, so the detector was not called while paused
    let resumed = sampler.tick().await.unwrap();
    assert_eq!(resumed.transition, Some(Transition::Started));
    assert_eq!(sampler.stopwatch().current_elapsed(), 100);
}

#[tokio::test]
async fn test_sensor_loss_is_fatal() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, |clock| ScriptedSource::new(clock, 100).lost_at(2));
    sampler.initialize().await.unwrap();

    sampler.tick().await.unwrap();
    sampler.tick().await.unwrap();
    let err = sampler.tick().await.unwrap_err();

    assert!(matches!(err, Error::SensorUnavailable(_)));
    assert_eq!(sampler.state(), LoopState::Failed);
    assert!(!sampler.stopwatch().is_running());
    assert_eq!(sampler.stopwatch().current_elapsed(), 200);
    assert_eq!(sampler.display().last_status(), Some("camera/model error"));
    assert_eq!(sampler.display().last_style(), Some(StatusStyle::CameraError));
    assert!(sampler.tick().await.is_err());
}

#[tokio::test]
async fn test_camera_denied_never_samples() {
    let mut sampler = make_loop(ScriptedDetector::new(vec![]), |clock| ScriptedSource::new(clock, 100).denied());

    let err = sampler.initialize().await.unwrap_err();
    assert!(matches!(err, Error::SensorUnavailable(_)));
    assert_eq!(sampler.state(), LoopState::Failed);
    assert_eq!(sampler.display().last_status(), Some("camera/model error"));
}

#[tokio::test]
async fn test_model_load_failure() {
    let mut sampler = make_loop(ScriptedDetector::failing_load(), every_100ms);

    assert!(matches!(sampler.initialize().await, Err(Error::ModelLoad(_))));
    assert_eq!(sampler.state(), LoopState::Failed);
    assert_eq!(sampler.display().statuses[0], ("loading model".to_string(), StatusStyle::Loading));
    assert_eq!(sampler.display().readouts[0], "00:00:00");
}

#[tokio::test]
async fn test_fatal_detector_error_stops_sampling() {
    let detector = ScriptedDetector::new(vec![Scripted::Face(head_down()), Scripted::Fatal]);
    let mut sampler = make_loop(detector, every_100ms);
    sampler.initialize().await.unwrap();

    sampler.tick().await.unwrap();
    assert!(matches!(sampler.tick().await, Err(Error::ModelLoad(_))));
    assert_eq!(sampler.state(), LoopState::Failed);
    assert_eq!(sampler.stopwatch().current_elapsed(), 100);
}

#[tokio::test]
async fn test_hold_blocks_auto_restart() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, every_100ms);
    sampler.initialize().await.unwrap();

    sampler.tick().await.unwrap();
    sampler.hold();
    assert!(!sampler.stopwatch().is_running());

    let held = sampler.tick().await.unwrap();
    assert!(held.studying);
    assert!(held.transition.is_none());
    assert!(!sampler.stopwatch().is_running());

    sampler.release();
    let released = sampler.tick().await.unwrap();
    assert_eq!(released.transition, Some(Transition::Started));
    assert_eq!(sampler.stopwatch().start_count(), 2);
}

#[tokio::test]
async fn test_without_auto_start_waits_for_release() {
    let config = LoopConfig {
        auto_start: false,
        ..LoopConfig::default()
    };
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop_with(config, detector, every_100ms);
    sampler.initialize().await.unwrap();

    assert!(sampler.tick().await.unwrap().transition.is_none());
    sampler.release();
    assert_eq!(sampler.tick().await.unwrap().transition, Some(Transition::Started));
}

#[tokio::test]
async fn test_readout_refresh_cadence() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, |clock| ScriptedSource::new(clock, 250));
    sampler.initialize().await.unwrap();

    for _ in 0..9 {
        sampler.tick().await.unwrap();
    }

    assert_eq!(sampler.display().readouts, vec!["00:00:00", "00:00:00", "00:00:01", "00:00:02"]);
}

#[tokio::test]
async fn test_reset_zeroes_readout() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, |clock| ScriptedSource::new(clock, 1000));
    sampler.initialize().await.unwrap();

    for _ in 0..4 {
        sampler.tick().await.unwrap();
    }
    assert_eq!(sampler.stopwatch().current_elapsed(), 3000);

    sampler.reset();
    assert_eq!(sampler.display().last_readout(), Some("00:00:00"));
    assert!(sampler.stopwatch().is_running());
}

#[tokio::test]
async fn test_consecutive_filter_delays_start() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, every_100ms).with_filter(create_filter("consecutive:3").unwrap());
    sampler.initialize().await.unwrap();

    let first = sampler.tick().await.unwrap();
    assert!(first.study.studying);
    assert!(!first.studying);
    assert!(sampler.tick().await.unwrap().transition.is_none());
    assert_eq!(sampler.tick().await.unwrap().transition, Some(Transition::Started));
}

#[tokio::test]
async fn test_paused_source_bypasses_filter() {
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop(detector, |clock| {
        ScriptedSource::new(clock, 1000).with_readiness(vec![
            Readiness::Playing,
            Readiness::Playing,
            Readiness::Playing,
            Readiness::Paused,
            Readiness::Paused,
            Readiness::Playing,
        ])
    })
    .with_filter(create_filter("consecutive:3").unwrap());
    sampler.initialize().await.unwrap();

    for _ in 0..3 {
        sampler.tick().await.unwrap();
    }
    assert!(sampler.stopwatch().is_running());

    let paused = sampler.tick().await.unwrap();
    assert_eq!(paused.transition, Some(Transition::Paused));
    assert!(!paused.studying);
    assert_eq!(paused.elapsed_ms, 1000);

    let still_paused = sampler.tick().await.unwrap();
    assert!(still_paused.transition.is_none());
    assert_eq!(still_paused.elapsed_ms, 1000);

    // Filter history was cleared, so resuming needs a fresh streak
    let resumed = sampler.tick().await.unwrap();
    assert!(resumed.study.studying);
    assert!(resumed.transition.is_none());
    assert_eq!(sampler.stopwatch().current_elapsed(), 1000);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_source_ends() {
    let config = LoopConfig {
        stop_on_end: true,
        ..LoopConfig::default()
    };
    let detector = ScriptedDetector::new(vec![]).then(Scripted::Face(head_down()));
    let mut sampler = make_loop_with(config, detector, |clock| {
        ScriptedSource::new(clock, 100).with_readiness(vec![Readiness::Playing, Readiness::Playing, Readiness::Ended])
    });

    let summary = sampler.run().await.unwrap();

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.starts, 1);
    assert_eq!(summary.elapsed_ms, 200);
    assert_eq!(summary.elapsed, "00:00:00");
    assert!(!sampler.stopwatch().is_running());
}
