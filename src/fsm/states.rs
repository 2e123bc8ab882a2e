//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[magnitude >= threshold]──▶ ALERTING ─┐
//!    ▲                                  │       │ [debounce elapsed]
//!    │                                  │       ▼
//!    └──────[magnitude < threshold]─────┘    fire pulse
//! ```
//!
//! The visual feedback follows the *level* (start on enter, stop on exit);
//! the discrete pulse repeats every debounce window for as long as the
//! trigger stays in `Alerting`.

use super::context::{AlertContext, VisualCommand};
use super::{StateDescriptor, StateId};
use log::trace;

/// Build the static state table.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Alerting
        StateDescriptor {
            id: StateId::Alerting,
            name: "Alerting",
            on_enter: Some(alerting_enter),
            on_exit: Some(alerting_exit),
            on_update: alerting_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut AlertContext) {
    ctx.commands.fire_pulse = false;
}

fn idle_update(ctx: &mut AlertContext) -> Option<StateId> {
    if ctx.above_threshold() {
        return Some(StateId::Alerting);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERTING
// ═══════════════════════════════════════════════════════════════════════════

fn alerting_enter(ctx: &mut AlertContext) {
    ctx.commands.visual = VisualCommand::Start;
    // The crossing sample itself is eligible for a pulse.
    gate_pulse(ctx);
}

fn alerting_exit(ctx: &mut AlertContext) {
    ctx.commands.visual = VisualCommand::Stop;
    ctx.commands.fire_pulse = false;
}

fn alerting_update(ctx: &mut AlertContext) -> Option<StateId> {
    if !ctx.above_threshold() {
        return Some(StateId::Idle);
    }
    gate_pulse(ctx);
    None
}

fn gate_pulse(ctx: &mut AlertContext) {
    if ctx.debounce_elapsed() {
        trace!("pulse at {} ms ({:.1} µT)", ctx.now_ms, ctx.magnitude);
        ctx.last_pulse_ms = Some(ctx.now_ms);
        ctx.commands.fire_pulse = true;
    }
}
