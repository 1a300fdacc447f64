//! Finite state machines for widget interaction states
//!
//! A widget state is a small `Copy` enum. Events are `u32` codes; a state
//! answers `Some(next)` for the events it reacts to and `None` otherwise.
//!
//! ```rust
//! use mandats_core::StateTransitions;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Toggle {
//!     Off,
//!     On,
//! }
//!
//! impl StateTransitions for Toggle {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Toggle::Off, 1) => Some(Toggle::On),
//!             (Toggle::On, 1) => Some(Toggle::Off),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert_eq!(Toggle::Off.on_event(1), Some(Toggle::On));
//! assert_eq!(Toggle::Off.on_event(2), None);
//! ```

use std::hash::Hash;

/// Trait for state types that react to events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Apply `event` to `state` in place
///
/// Returns true when the state changed.
pub fn transition<S: StateTransitions>(state: &mut S, event: u32) -> bool {
    match state.on_event(event) {
        Some(next) if next != *state => {
            tracing::trace!("fsm: {:?} --{}--> {:?}", state, event, next);
            *state = next;
            true
        }
        _ => false,
    }
}
