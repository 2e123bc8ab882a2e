//! End-to-end tests of the sample pipeline through `DetectorService`.

use magdetect::alert::AlertDecision;
use magdetect::app::commands::AppCommand;
use magdetect::app::events::AppEvent;
use magdetect::app::ports::ClockPort;
use magdetect::app::service::DetectorService;
use magdetect::conditioning::FilterSeed;
use magdetect::config::DetectorConfig;
use magdetect::error::{ConfigError, Error, FeedbackError, SensorError};
use magdetect::fsm::StateId;
use magdetect::lifecycle::DetectionState;
use magdetect::sensors::{Sample, SensorRate};

use crate::mock_hw::{ManualClock, MockFeedback, MockSensor, RecordingSink, SensorCall};

const STRONG: Sample = Sample::new(0.0, 0.0, 100.0);
const QUIET: Sample = Sample::ZERO;

/// Seeded filter so the first reading equals the raw magnitude.
fn seeded_config() -> DetectorConfig {
    DetectorConfig {
        filter_seed: FilterSeed::FirstSample,
        threshold_ut: 80.0,
        ..DetectorConfig::default()
    }
}

struct Rig {
    app: DetectorService,
    sensor: MockSensor,
    ui: MockFeedback,
    sink: RecordingSink,
    clock: ManualClock,
}

impl Rig {
    fn new(config: DetectorConfig) -> Self {
        Self::with_sensor(config, MockSensor::new())
    }

    fn with_sensor(config: DetectorConfig, sensor: MockSensor) -> Self {
        let mut rig = Self {
            app: DetectorService::new(config),
            sensor,
            ui: MockFeedback::new(),
            sink: RecordingSink::new(),
            clock: ManualClock::new(),
        };
        rig.app.attach(&rig.sensor, &mut rig.ui, &mut rig.sink);
        rig
    }

    fn started(config: DetectorConfig) -> Self {
        let mut rig = Self::new(config);
        rig.app
            .start(&mut rig.sensor, &mut rig.ui, &mut rig.sink)
            .expect("start");
        rig
    }

    fn feed(&mut self, sample: Sample) -> AlertDecision {
        let now = self.clock.now_ms();
        self.app.on_sample(sample, now, &mut self.ui, &mut self.sink)
    }

    fn command(&mut self, cmd: AppCommand) {
        self.app
            .handle_command(cmd, &mut self.sensor, &mut self.ui, &mut self.sink);
    }
}

// ── Sensor availability ───────────────────────────────────────

#[test]
fn missing_sensor_shows_message_and_disables_toggle() {
    let mut rig = Rig::with_sensor(DetectorConfig::default(), MockSensor::missing());

    assert_eq!(rig.ui.last_text(), Some("Magnetometer not available"));
    assert_eq!(rig.ui.last_toggle(), Some(("Start Detection", false)));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SensorUnavailable)), 1);

    let result = rig.app.start(&mut rig.sensor, &mut rig.ui, &mut rig.sink);
    assert_eq!(result, Err(Error::Sensor(SensorError::Unavailable)));
    assert!(rig.sensor.calls.is_empty(), "no subscription attempted");
    assert_eq!(rig.app.detection_state(), DetectionState::Stopped);
}

#[test]
fn start_subscribes_at_configured_rate() {
    let config = DetectorConfig {
        sensor_rate: SensorRate::Ui,
        ..DetectorConfig::default()
    };
    let rig = Rig::started(config);

    assert_eq!(rig.sensor.calls, vec![SensorCall::Subscribe(SensorRate::Ui)]);
    assert_eq!(rig.ui.last_toggle(), Some(("Stop Detection", true)));
    assert_eq!(rig.app.detection_state(), DetectionState::Running);
    assert!(matches!(
        rig.sink.last(),
        Some(AppEvent::DetectionStarted {
            rate: SensorRate::Ui
        })
    ));
}

#[test]
fn subscribe_failure_leaves_detection_stopped() {
    let mut sensor = MockSensor::new();
    sensor.fail_subscribe = true;
    let mut rig = Rig::with_sensor(DetectorConfig::default(), sensor);

    let result = rig.app.start(&mut rig.sensor, &mut rig.ui, &mut rig.sink);
    assert_eq!(result, Err(Error::Sensor(SensorError::SubscribeFailed)));
    assert_eq!(rig.app.detection_state(), DetectionState::Stopped);
    assert_eq!(rig.ui.last_toggle(), Some(("Start Detection", true)));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::DetectionStarted { .. })), 0);
}

// ── Display ───────────────────────────────────────────────────

#[test]
fn every_sample_renders_one_decimal_reading() {
    let mut rig = Rig::started(seeded_config());

    rig.feed(Sample::new(30.0, 40.0, 0.0));
    assert_eq!(rig.ui.last_text(), Some("Magnetic Field Strength: 50.0 µT"));

    rig.feed(Sample::new(30.0, 40.0, 0.0));
    rig.feed(Sample::new(30.0, 40.0, 0.0));
    assert_eq!(rig.ui.text_count(), 3);
}

#[test]
fn samples_before_start_are_ignored() {
    let mut rig = Rig::new(seeded_config());
    assert_eq!(rig.feed(STRONG), AlertDecision::None);
    assert_eq!(rig.ui.text_count(), 0);
    assert_eq!(rig.app.stats().samples, 0);
}

// ── Alerting ──────────────────────────────────────────────────

#[test]
fn crossing_threshold_fires_haptic_and_tone() {
    let mut rig = Rig::started(seeded_config());

    assert_eq!(rig.feed(STRONG), AlertDecision::Pulse);
    assert_eq!(rig.app.alert_state(), StateId::Alerting);
    assert!(rig.app.is_pulsing());
    assert_eq!(rig.ui.vibrations(), vec![40]);
    assert_eq!(rig.ui.tones(), vec![(120, 80)]);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertEntered { .. })), 1);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Pulse { .. })), 1);
}

#[test]
fn sustained_field_pulses_once_per_debounce_window() {
    let mut rig = Rig::started(seeded_config());

    // 50 deliveries at 20 ms: t = 0 ..= 980
    for _ in 0..50 {
        rig.feed(STRONG);
        rig.clock.advance(20);
    }
    assert_eq!(rig.ui.vibrations().len(), 4, "pulses at 0, 300, 600 and 900 ms");
    assert_eq!(rig.app.stats().pulses, 4);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertEntered { .. })), 1);
}

#[test]
fn dropping_below_threshold_resets_scale_exactly() {
    let mut rig = Rig::started(seeded_config());

    rig.feed(STRONG);
    rig.clock.advance(20);
    let mid = rig.app.advance_animation(175, &mut rig.ui);
    assert!(mid > 1.0, "animation should be mid-swing, got {mid}");

    // 100 → 85 (still alerting) → 72.25 (cleared)
    rig.feed(QUIET);
    assert!(rig.app.is_pulsing());
    rig.feed(QUIET);

    assert_eq!(rig.app.alert_state(), StateId::Idle);
    assert!(!rig.app.is_pulsing());
    assert_eq!(rig.ui.last_scale(), Some(1.0));
    assert_eq!(rig.app.advance_animation(16, &mut rig.ui), 1.0);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertCleared { .. })), 1);
}

#[test]
fn haptic_failure_is_counted_but_never_surfaced() {
    let mut rig = Rig::started(seeded_config());
    rig.ui.haptic_result = Err(FeedbackError::PermissionDenied);

    assert_eq!(rig.feed(STRONG), AlertDecision::Pulse);
    assert_eq!(rig.ui.tones().len(), 1, "tone still plays");
    assert_eq!(rig.ui.last_text(), Some("Magnetic Field Strength: 100.0 µT"));

    let stats = rig.app.stats();
    assert_eq!(stats.pulses, 1);
    assert_eq!(stats.feedback_suppressed, 1);
    assert_eq!(rig.app.detection_state(), DetectionState::Running);
}

#[test]
fn disabled_channels_are_not_requested() {
    let config = DetectorConfig {
        haptic_enabled: false,
        tone_enabled: false,
        visual_pulse_enabled: false,
        ..seeded_config()
    };
    let mut rig = Rig::started(config);

    assert_eq!(rig.feed(STRONG), AlertDecision::Pulse);
    assert!(rig.ui.vibrations().is_empty());
    assert!(rig.ui.tones().is_empty());
    assert!(!rig.app.is_pulsing());
    assert_eq!(rig.app.stats().feedback_suppressed, 0);
}

// ── Start / stop ──────────────────────────────────────────────

#[test]
fn stop_while_alerting_returns_view_to_neutral() {
    let mut rig = Rig::started(seeded_config());
    rig.feed(STRONG);
    rig.app.advance_animation(100, &mut rig.ui);

    rig.command(AppCommand::ToggleDetection);

    assert_eq!(rig.app.detection_state(), DetectionState::Stopped);
    assert_eq!(rig.app.alert_state(), StateId::Idle);
    assert!(!rig.sensor.is_subscribed());
    assert_eq!(rig.sensor.calls.last(), Some(&SensorCall::Unsubscribe));
    assert_eq!(rig.ui.last_scale(), Some(1.0));
    assert_eq!(rig.ui.last_toggle(), Some(("Start Detection", true)));

    let texts = rig.ui.text_count();
    assert_eq!(rig.feed(STRONG), AlertDecision::None);
    assert_eq!(rig.ui.text_count(), texts, "late delivery must not render");
}

#[test]
fn restart_resets_filter_and_debounce() {
    let mut rig = Rig::started(DetectorConfig::default());
    for _ in 0..40 {
        rig.feed(STRONG);
        rig.clock.advance(20);
    }
    assert!(rig.app.magnitude() > 90.0);

    rig.command(AppCommand::StopDetection);
    rig.command(AppCommand::StartDetection);

    // Zero-seeded filter restarts from the origin: 0.15 × 100
    rig.feed(STRONG);
    assert!((rig.app.magnitude() - 15.0).abs() < 1e-3);
    assert_eq!(rig.sensor.subscribe_count(), 2);
}

#[test]
fn toggle_twice_round_trips() {
    let mut rig = Rig::new(DetectorConfig::default());
    rig.command(AppCommand::ToggleDetection);
    assert!(rig.sensor.is_subscribed());
    rig.command(AppCommand::ToggleDetection);
    assert!(!rig.sensor.is_subscribed());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::DetectionStopped)), 1);
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected_and_ignored() {
    let mut rig = Rig::started(seeded_config());
    let bad = DetectorConfig {
        threshold_ut: -1.0,
        ..seeded_config()
    };

    let result = rig
        .app
        .update_config(bad, &mut rig.sensor, &mut rig.ui, &mut rig.sink);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
    assert_eq!(rig.app.config().threshold_ut, 80.0);
    assert!(matches!(rig.sink.last(), Some(AppEvent::ConfigRejected(_))));
}

#[test]
fn rejected_config_command_keeps_running_config() {
    let mut rig = Rig::started(seeded_config());
    rig.command(AppCommand::UpdateConfig(DetectorConfig {
        pulse_half_period_ms: 3_000_000_000,
        ..seeded_config()
    }));

    assert_eq!(rig.app.config().pulse_half_period_ms, 350);
    assert!(matches!(rig.sink.last(), Some(AppEvent::ConfigRejected(_))));
    assert_eq!(rig.app.detection_state(), DetectionState::Running);
}

#[test]
fn raised_threshold_applies_to_next_sample() {
    let mut rig = Rig::started(seeded_config());
    rig.command(AppCommand::UpdateConfig(DetectorConfig {
        threshold_ut: 150.0,
        ..seeded_config()
    }));

    assert_eq!(rig.feed(STRONG), AlertDecision::None);
    assert_eq!(rig.app.alert_state(), StateId::Idle);
    assert!(matches!(rig.sink.last(), Some(AppEvent::ConfigUpdated)));
}

#[test]
fn rate_change_resubscribes() {
    let mut rig = Rig::started(DetectorConfig::default());
    rig.command(AppCommand::UpdateConfig(DetectorConfig {
        sensor_rate: SensorRate::Ui,
        ..DetectorConfig::default()
    }));

    assert_eq!(
        rig.sensor.calls,
        vec![
            SensorCall::Subscribe(SensorRate::Game),
            SensorCall::Unsubscribe,
            SensorCall::Subscribe(SensorRate::Ui),
        ]
    );
    assert_eq!(rig.sensor.subscribed, Some(SensorRate::Ui));
}
