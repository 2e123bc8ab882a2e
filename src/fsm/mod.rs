//! Function-pointer finite state machine engine for the alert trigger.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StateTable                                                │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐   │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update         │   │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤   │
//! │  │ Idle     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ Alerting │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │   │
//! │  └──────────┴───────────┴──────────┴───────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is ticked once per delivered sample.  `on_update` for the
//! current state decides whether to move; on a move the engine runs
//! `on_exit` for the old state and `on_enter` for the new one.  Every
//! handler receives the [`AlertContext`] holding the latest magnitude,
//! the clock, the debounce memory and the feedback commands.

pub mod context;
pub mod states;

use context::AlertContext;
use log::debug;

// ── States ────────────────────────────────────────────────────

/// Alert trigger states.  The discriminant is the row in the table built
/// by [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Alerting = 1,
}

impl StateId {
    /// Number of rows in the state table.
    pub const COUNT: usize = 2;

    const fn row(self) -> usize {
        self as usize
    }
}

/// `on_enter` / `on_exit` hook.
pub type StateActionFn = fn(&mut AlertContext);

/// Per-sample handler.  `Some(next)` moves the machine, `None` stays put.
pub type StateUpdateFn = fn(&mut AlertContext) -> Option<StateId>;

pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ── Engine ────────────────────────────────────────────────────

pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    state: StateId,
    /// Samples fed since construction.
    samples: u64,
    /// Value of `samples` when `state` was entered.
    entered_at: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            state: initial,
            samples: 0,
            entered_at: 0,
        }
    }

    /// Run `on_enter` for the initial state.  Call once, before any sample.
    pub fn start(&mut self, ctx: &mut AlertContext) {
        let row = self.descriptor(self.state);
        debug!("alert FSM starting in {}", row.name);
        if let Some(enter) = row.on_enter {
            enter(ctx);
        }
    }

    /// Feed one sample through the current state's update handler.
    pub fn tick(&mut self, ctx: &mut AlertContext) {
        self.samples += 1;
        ctx.samples_in_state = self.ticks_in_current_state();

        if let Some(next) = (self.descriptor(self.state).on_update)(ctx) {
            self.enter(next, ctx);
        }
    }

    /// Move to `next` outside the normal update path.  Moving to the
    /// current state runs no hooks.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut AlertContext) {
        if next != self.state {
            self.enter(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        self.state
    }

    /// Samples fed since the current state was entered.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.samples - self.entered_at
    }

    fn descriptor(&self, id: StateId) -> &StateDescriptor {
        &self.table[id.row()]
    }

    fn enter(&mut self, next: StateId, ctx: &mut AlertContext) {
        let from = self.descriptor(self.state);
        let to = self.descriptor(next);
        debug!("alert FSM {} -> {}", from.name, to.name);
        let (exit, enter) = (from.on_exit, to.on_enter);

        if let Some(exit) = exit {
            exit(ctx);
        }
        self.state = next;
        self.entered_at = self.samples;
        ctx.samples_in_state = 0;
        if let Some(enter) = enter {
            enter(ctx);
        }
    }
}
