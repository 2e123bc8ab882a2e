//! MagDetect host simulation: main entry point
//!
//! Drives the full detector core with host adapters: a scripted
//! magnetometer sweeping past a ferrous object, console feedback and the
//! log event sink.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                   │
//! │  SimMagnetometer   ConsoleFeedback   LogEventSink  Clock  │
//! │  (Magnetometer)    (Feedback)        (EventSink)          │
//! │                                                           │
//! │  ───────────────── Port Trait Boundary ─────────────────  │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │       DetectorService (pure logic)                  │  │
//! │  │  Conditioner · AlertTrigger · PulseAnimator         │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Set `MAGDETECT_CONFIG` to a JSON file to override any configuration
//! field, and `RUST_LOG=debug` to see every rendered reading.

#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::info;

use magdetect::adapters::console::ConsoleFeedback;
use magdetect::adapters::log_sink::LogEventSink;
use magdetect::adapters::time::MonotonicClock;
use magdetect::app::commands::AppCommand;
use magdetect::app::ports::ClockPort;
use magdetect::app::service::DetectorService;
use magdetect::config::DetectorConfig;
use magdetect::sensors::Sample;
use magdetect::sensors::magnetometer::{SimMagnetometer, magnet_pass};

const CONFIG_ENV: &str = "MAGDETECT_CONFIG";

/// Ambient (earth) field, ~47 µT.
const EARTH_FIELD: Sample = Sample::new(22.0, -5.0, 41.0);
const PASS_SAMPLES: usize = 150;
/// A strong pass over a steel object, then a faint one that stays below
/// the default threshold.
const STRONG_PASS_UT: f32 = 70.0;
const FAINT_PASS_UT: f32 = 8.0;
/// How long the simulated host spends in the background mid-run.
const BACKGROUND_MS: u64 = 500;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("MagDetect simulator v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    let interval_ms = config.sensor_rate.nominal_interval_ms();

    // ── 3. Adapters ───────────────────────────────────────────
    let mut sensor = SimMagnetometer::new(true);
    sensor.extend(magnet_pass(EARTH_FIELD, STRONG_PASS_UT, PASS_SAMPLES));
    sensor.extend(magnet_pass(EARTH_FIELD, FAINT_PASS_UT, PASS_SAMPLES));
    let mut ui = ConsoleFeedback::new(true, true);
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 4. Service ────────────────────────────────────────────
    let mut app = DetectorService::new(config);
    if !app.attach(&sensor, &mut ui, &mut sink) {
        bail!("no magnetometer available");
    }
    app.start(&mut sensor, &mut ui, &mut sink)?;

    // ── 5. Delivery loop ──────────────────────────────────────
    let mut delivered = 0usize;
    let mut last_ms = clock.now_ms();
    while sensor.pending() > 0 {
        if delivered == PASS_SAMPLES {
            app.handle_command(AppCommand::HostPaused, &mut sensor, &mut ui, &mut sink);
            thread::sleep(Duration::from_millis(BACKGROUND_MS));
            app.handle_command(AppCommand::HostResumed, &mut sensor, &mut ui, &mut sink);
        }

        let Some(sample) = sensor.poll() else {
            // Listener gone (resubscribe failed); nothing more will arrive.
            break;
        };
        let now_ms = clock.now_ms();
        app.on_sample(sample, now_ms, &mut ui, &mut sink);
        app.advance_animation(now_ms.saturating_sub(last_ms) as u32, &mut ui);
        last_ms = now_ms;
        delivered += 1;

        thread::sleep(Duration::from_millis(u64::from(interval_ms)));
    }

    // ── 6. Shutdown ───────────────────────────────────────────
    app.stop(&mut sensor, &mut ui, &mut sink);
    sink.log_stats(&app.stats());
    info!(
        "simulation finished after {} samples in {} s; last reading: {}",
        delivered,
        clock.uptime_secs(),
        ui.last_text()
    );
    Ok(())
}

/// Defaults, optionally overridden by the JSON file named in `MAGDETECT_CONFIG`.
fn load_config() -> Result<DetectorConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(DetectorConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = DetectorConfig::from_json(&text).with_context(|| format!("parsing {path}"))?;
    info!("configuration loaded from {}", path);
    Ok(config)
}
