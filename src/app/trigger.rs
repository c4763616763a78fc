//! One-shot trigger latch.
//!
//! ```text
//!            trigger(v), 1 ≤ v ≤ 8
//!   ┌──────┐ ─────────────────────▶ ┌───────┐
//!   │ Idle │                        │ Fired │ ◀── trigger(*) ignored
//!   └──────┘ ◀───────────────────── └───────┘
//!                switch edge
//! ```
//!
//! The latch only decides; sending is done by the service.

use crate::config::{CLEAR_REPEAT_INDEX, TARGET_COUNT};

/// Latch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    #[default]
    Idle,
    Fired,
}

/// Result of offering a trigger value to the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Latch moved to Fired; `index` is the zero-based target slot.
    Fire { index: usize },
    /// Already Fired; nothing to do.
    Latched,
    /// Value does not name a target; state unchanged.
    OutOfRange,
}

#[derive(Debug, Default)]
pub struct TriggerController {
    state: LatchState,
}

impl TriggerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Offer a decoded trigger value.
    ///
    /// A latched controller ignores every value, valid or not.
    pub fn on_trigger(&mut self, value: i32) -> TriggerOutcome {
        if self.state == LatchState::Fired {
            return TriggerOutcome::Latched;
        }
        match usize::try_from(value) {
            Ok(v) if (1..=TARGET_COUNT).contains(&v) => {
                self.state = LatchState::Fired;
                TriggerOutcome::Fire { index: v - 1 }
            }
            _ => TriggerOutcome::OutOfRange,
        }
    }

    /// Accepted switch edge.  Returns to Idle from either state.
    pub fn on_reset(&mut self) {
        self.state = LatchState::Idle;
    }
}

/// Target indices that receive a clear, in send order.
pub fn clear_sequence() -> impl Iterator<Item = usize> {
    (0..TARGET_COUNT).chain(core::iter::once(CLEAR_REPEAT_INDEX))
}
