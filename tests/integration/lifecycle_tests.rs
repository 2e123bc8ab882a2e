//! Foreground/background and start/stop interplay.

use magdetect::alert::AlertDecision;
use magdetect::app::commands::AppCommand;
use magdetect::app::events::AppEvent;
use magdetect::app::service::DetectorService;
use magdetect::config::DetectorConfig;
use magdetect::fsm::StateId;
use magdetect::lifecycle::DetectionState;
use magdetect::sensors::magnetometer::SimMagnetometer;
use magdetect::sensors::{Sample, SensorRate};

use crate::mock_hw::{MockFeedback, MockSensor, RecordingSink, SensorCall};

const STRONG: Sample = Sample::new(0.0, 0.0, 100.0);

fn attached(sensor: &MockSensor) -> (DetectorService, MockFeedback, RecordingSink) {
    let mut app = DetectorService::new(DetectorConfig::default());
    let mut ui = MockFeedback::new();
    let mut sink = RecordingSink::new();
    assert!(app.attach(sensor, &mut ui, &mut sink));
    (app, ui, sink)
}

#[test]
fn pause_unsubscribes_and_resume_resubscribes() {
    let mut sensor = MockSensor::new();
    let (mut app, mut ui, mut sink) = attached(&sensor);

    app.handle_command(AppCommand::StartDetection, &mut sensor, &mut ui, &mut sink);
    app.handle_command(AppCommand::HostPaused, &mut sensor, &mut ui, &mut sink);
    assert!(!sensor.is_subscribed());
    assert_eq!(app.detection_state(), DetectionState::Running);

    app.handle_command(AppCommand::HostResumed, &mut sensor, &mut ui, &mut sink);
    assert_eq!(
        sensor.calls,
        vec![
            SensorCall::Subscribe(SensorRate::Game),
            SensorCall::Unsubscribe,
            SensorCall::Subscribe(SensorRate::Game),
        ]
    );
    assert!(matches!(
        sink.last(),
        Some(AppEvent::Resumed { resubscribed: true })
    ));
}

#[test]
fn samples_while_paused_are_dropped() {
    let mut sensor = MockSensor::new();
    let (mut app, mut ui, mut sink) = attached(&sensor);
    app.start(&mut sensor, &mut ui, &mut sink).expect("start");
    app.pause(&mut sensor, &mut ui, &mut sink);

    assert_eq!(app.on_sample(STRONG, 0, &mut ui, &mut sink), AlertDecision::None);
    assert_eq!(app.stats().samples, 0);
    assert_eq!(ui.text_count(), 0);
}

#[test]
fn pause_while_alerting_cancels_animation_but_keeps_alert_state() {
    let mut sensor = MockSensor::new();
    let (mut app, mut ui, mut sink) = attached(&sensor);
    app.start(&mut sensor, &mut ui, &mut sink).expect("start");
    for t in 0..20 {
        app.on_sample(STRONG, t * 20, &mut ui, &mut sink);
    }
    assert!(app.is_pulsing());
    app.advance_animation(120, &mut ui);

    app.pause(&mut sensor, &mut ui, &mut sink);
    assert!(!app.is_pulsing());
    assert_eq!(ui.last_scale(), Some(1.0));
    assert_eq!(app.alert_state(), StateId::Alerting);

    // First sample after resume restarts the pulse.
    app.resume(&mut sensor, &mut ui, &mut sink);
    app.on_sample(STRONG, 1000, &mut ui, &mut sink);
    assert!(app.is_pulsing());
}

#[test]
fn stop_then_background_then_resume_never_resubscribes() {
    let mut sensor = SimMagnetometer::new(true);
    let mut ui = MockFeedback::new();
    let mut sink = RecordingSink::new();
    let mut app = DetectorService::new(DetectorConfig::default());
    app.attach(&sensor, &mut ui, &mut sink);

    app.start(&mut sensor, &mut ui, &mut sink).expect("start");
    sensor.extend([STRONG; 30]);
    for t in 0..30 {
        let sample = sensor.poll().expect("subscribed");
        app.on_sample(sample, t * 20, &mut ui, &mut sink);
    }
    assert_eq!(app.alert_state(), StateId::Alerting);

    app.stop(&mut sensor, &mut ui, &mut sink);
    app.pause(&mut sensor, &mut ui, &mut sink);
    app.resume(&mut sensor, &mut ui, &mut sink);

    assert_eq!(sensor.subscribed_rate(), None);
    assert_eq!(sensor.subscribe_count(), 1);
    assert_eq!(app.detection_state(), DetectionState::Stopped);
    assert!(matches!(
        sink.last(),
        Some(AppEvent::Resumed {
            resubscribed: false
        })
    ));

    sensor.push(STRONG);
    assert_eq!(sensor.poll(), None, "no listener, no deliveries");
}

#[test]
fn start_in_background_defers_subscription() {
    let mut sensor = MockSensor::new();
    let (mut app, mut ui, mut sink) = attached(&sensor);

    app.pause(&mut sensor, &mut ui, &mut sink);
    app.start(&mut sensor, &mut ui, &mut sink).expect("start");
    assert_eq!(app.detection_state(), DetectionState::Running);
    assert!(sensor.calls.is_empty());

    app.resume(&mut sensor, &mut ui, &mut sink);
    assert_eq!(sensor.calls, vec![SensorCall::Subscribe(SensorRate::Game)]);
    assert!(app.is_subscribed());
}

#[test]
fn resume_failure_rolls_back_to_stopped() {
    let mut sensor = MockSensor::new();
    let (mut app, mut ui, mut sink) = attached(&sensor);
    app.start(&mut sensor, &mut ui, &mut sink).expect("start");
    for t in 0..30 {
        app.on_sample(STRONG, t * 20, &mut ui, &mut sink);
    }
    assert_eq!(app.alert_state(), StateId::Alerting);
    app.pause(&mut sensor, &mut ui, &mut sink);

    sensor.fail_subscribe = true;
    app.resume(&mut sensor, &mut ui, &mut sink);

    assert_eq!(app.detection_state(), DetectionState::Stopped);
    assert_eq!(app.alert_state(), StateId::Idle);
    assert!(!app.is_subscribed());
    assert!(!app.is_pulsing());
    assert_eq!(ui.last_scale(), Some(1.0));
    assert_eq!(ui.last_toggle(), Some(("Start Detection", true)));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::DetectionStopped)), 1);
    assert!(matches!(
        sink.last(),
        Some(AppEvent::Resumed {
            resubscribed: false
        })
    ));
}
