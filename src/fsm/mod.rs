//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, generic over the state enum and the
//! context each subsystem threads through its handlers:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable<S, C>                                            │
//! │  ┌──────────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ S            │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├──────────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Init         │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<S>│ │
//! │  │ Acquire      │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<S>│ │
//! │  │ ...          │           │          │                   │ │
//! │  └──────────────┴───────────┴──────────┴───────────────────┘ │
//! │  preempt: fn(S, ctx) -> Option<S>   (global override)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine first asks the optional pre-emption guard.  If
//! it names a state, that state wins the tick: the engine transitions
//! (unless it is already there) and skips `on_update`.  Otherwise it
//! calls `on_update` for the current state, and a returned `Some(next)`
//! runs `on_exit` for the current state and `on_enter` for the next.
//! At most one transition fires per tick.

use core::fmt::Debug;

use log::info;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// A closed set of states.  `index` must be dense in `0..COUNT` and
/// match the row order of the state table.
pub trait StateSet: Copy + Eq + Debug + 'static {
    const COUNT: usize;

    fn index(self) -> usize;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn<C> = fn(&mut C);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn<S, C> = fn(&mut C) -> Option<S>;

/// Global override evaluated before the current state's update.
pub type PreemptFn<S, C> = fn(S, &mut C) -> Option<S>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor<S, C> {
    pub id: S,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<C>>,
    pub on_exit: Option<StateActionFn<C>>,
    pub on_update: StateUpdateFn<S, C>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the current state.  The context is owned by
/// the caller and threaded through every handler call.
pub struct Fsm<S: StateSet, C, const N: usize> {
    /// Used in transition log lines, e.g. `"Hatch"`.
    label: &'static str,
    /// Fixed-size table indexed by `S::index`.
    table: [StateDescriptor<S, C>; N],
    preempt: Option<PreemptFn<S, C>>,
    initial: S,
    current: S,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl<S: StateSet, C, const N: usize> Fsm<S, C, N> {
    /// Build an FSM from its table.  Fails if the table length does not
    /// match `S::COUNT` or a row sits at the wrong index.
    pub fn new(label: &'static str, table: [StateDescriptor<S, C>; N], initial: S) -> Result<Self> {
        if N != S::COUNT {
            return Err(Error::StateTable(label));
        }
        if table.iter().enumerate().any(|(i, row)| row.id.index() != i) {
            return Err(Error::StateTable(label));
        }
        Ok(Self {
            label,
            table,
            preempt: None,
            initial,
            current: initial,
            tick_count: 0,
            state_entry_tick: 0,
        })
    }

    /// Install a global override guard.
    #[must_use]
    pub fn with_preempt(mut self, preempt: PreemptFn<S, C>) -> Self {
        self.preempt = Some(preempt);
        self
    }

    /// Reset to the initial state and run its `on_enter`.
    /// Call before the first `tick()`, and again after every stop.
    pub fn start(&mut self, ctx: &mut C) {
        self.current = self.initial;
        self.tick_count = 0;
        self.state_entry_tick = 0;
        info!("{}: starting in {}", self.label, self.current_name());
        if let Some(enter) = self.row(self.current).on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// Returns the new state if a transition fired.
    pub fn tick(&mut self, ctx: &mut C) -> Option<S> {
        self.tick_count += 1;

        if let Some(preempt) = self.preempt {
            if let Some(next) = preempt(self.current, ctx) {
                return self.force_transition(next, ctx);
            }
        }

        let next = (self.row(self.current).on_update)(ctx)?;
        self.transition(next, ctx);
        Some(next)
    }

    /// Jump straight to `next`, running exit/enter actions.  A request
    /// for the current state is a no-op.
    pub fn force_transition(&mut self, next: S, ctx: &mut C) -> Option<S> {
        if next == self.current {
            return None;
        }
        self.transition(next, ctx);
        Some(next)
    }

    /// The current state's identity.
    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn current_name(&self) -> &'static str {
        self.row(self.current).name
    }

    pub fn name_of(&self, state: S) -> &'static str {
        self.row(state).name
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn row(&self, state: S) -> &StateDescriptor<S, C> {
        &self.table[state.index()]
    }

    fn transition(&mut self, next: S, ctx: &mut C) {
        info!(
            "{}: {} -> {}",
            self.label,
            self.current_name(),
            self.row(next).name
        );

        if let Some(exit) = self.row(self.current).on_exit {
            exit(ctx);
        }

        self.current = next;
        self.state_entry_tick = self.tick_count;

        if let Some(enter) = self.row(self.current).on_enter {
            enter(ctx);
        }
    }
}
