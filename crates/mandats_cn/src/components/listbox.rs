//! Headless listbox behaviour
//!
//! Tracks whether the option list is open, which row is active
//! (highlighted) and where keyboard focus should land after the next
//! render. Rendering is left to the component using it.

use mandats_core::{transition, StateTransitions};

// =============================================================================
// Listbox Event Types
// =============================================================================

/// Event types for the listbox state machine
pub mod listbox_events {
    /// Trigger activated (Closed <-> Open)
    pub const TOGGLE: u32 = 21001;
    /// Open request (Closed -> Open)
    pub const OPEN: u32 = 21002;
    /// Close request (Open -> Closed)
    pub const CLOSE: u32 = 21003;
    /// Escape key pressed in the list
    pub const ESCAPE: u32 = 21004;
    /// Focus left the list
    pub const BLUR: u32 = 21005;
    /// Control became disabled
    pub const DISABLE: u32 = 21006;
    /// An option was chosen
    pub const SELECT: u32 = 21007;
}

// =============================================================================
// ListboxState - FSM
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ListboxState {
    #[default]
    Closed,
    Open,
}

impl StateTransitions for ListboxState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use listbox_events::*;
        match (self, event) {
            (ListboxState::Closed, TOGGLE | OPEN) => Some(ListboxState::Open),
            (ListboxState::Open, TOGGLE | CLOSE | ESCAPE | BLUR | DISABLE | SELECT) => {
                Some(ListboxState::Closed)
            }
            _ => None,
        }
    }
}

/// Keyboard movement inside the list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    Up,
    Down,
    Home,
    End,
}

/// Element that should receive focus after the next render
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusRequest {
    /// The option list, right after opening
    Options,
    /// The trigger button, after a close that returns focus
    Button,
}

/// Listbox interaction state
#[derive(Clone, Debug, Default)]
pub struct Listbox {
    state: ListboxState,
    active: Option<usize>,
    focus_request: Option<FocusRequest>,
}

impl Listbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ListboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ListboxState::Open
    }

    /// Highlighted row while open
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn focus_request(&self) -> Option<FocusRequest> {
        self.focus_request
    }

    pub fn clear_focus_request(&mut self) {
        self.focus_request = None;
    }

    /// Open the list with the selected row (or the first one) active
    pub fn open(&mut self, option_count: usize, selected: Option<usize>) -> bool {
        self.enter_open(listbox_events::OPEN, option_count, selected)
    }

    /// Flip between open and closed
    pub fn toggle(&mut self, option_count: usize, selected: Option<usize>) -> bool {
        if self.is_open() {
            self.close(listbox_events::TOGGLE, true)
        } else {
            self.enter_open(listbox_events::TOGGLE, option_count, selected)
        }
    }

    fn enter_open(&mut self, event: u32, option_count: usize, selected: Option<usize>) -> bool {
        if !transition(&mut self.state, event) {
            return false;
        }
        self.active = selected
            .filter(|&i| i < option_count)
            .or((option_count > 0).then_some(0));
        self.focus_request = Some(FocusRequest::Options);
        true
    }

    /// Close with `event`, optionally sending focus back to the button
    pub fn close(&mut self, event: u32, restore_focus: bool) -> bool {
        if !transition(&mut self.state, event) {
            return false;
        }
        self.active = None;
        self.focus_request = restore_focus.then_some(FocusRequest::Button);
        true
    }

    /// Close because the control is disabled; focus is left alone
    pub fn force_close(&mut self) -> bool {
        self.close(listbox_events::DISABLE, false)
    }

    /// Set the active row (ignored while closed or out of range)
    pub fn set_active(&mut self, index: usize, option_count: usize) -> bool {
        if !self.is_open() || index >= option_count || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Move the active row, clamping at both ends
    pub fn navigate(&mut self, navigation: Navigation, option_count: usize) -> bool {
        if !self.is_open() || option_count == 0 {
            return false;
        }
        let last = option_count - 1;
        let next = match (navigation, self.active) {
            (Navigation::Home, _) => 0,
            (Navigation::End, _) => last,
            (Navigation::Down, Some(i)) => (i + 1).min(last),
            (Navigation::Down, None) => 0,
            (Navigation::Up, Some(i)) => i.saturating_sub(1),
            (Navigation::Up, None) => last,
        };
        let changed = self.active != Some(next);
        self.active = Some(next);
        changed
    }

    /// Back to the initial closed state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use listbox_events::*;
        let closed = ListboxState::Closed;
        let open = ListboxState::Open;

        assert_eq!(closed.on_event(TOGGLE), Some(open));
        assert_eq!(closed.on_event(OPEN), Some(open));
        assert_eq!(closed.on_event(SELECT), None);
        assert_eq!(closed.on_event(BLUR), None);

        for event in [TOGGLE, CLOSE, ESCAPE, BLUR, DISABLE, SELECT] {
            assert_eq!(open.on_event(event), Some(closed));
        }
        assert_eq!(open.on_event(OPEN), None);
    }

    #[test]
    fn test_open_activates_selected_or_first() {
        let mut listbox = Listbox::new();
        assert!(listbox.open(3, Some(2)));
        assert_eq!(listbox.active(), Some(2));
        assert_eq!(listbox.focus_request(), Some(FocusRequest::Options));

        let mut listbox = Listbox::new();
        listbox.open(3, None);
        assert_eq!(listbox.active(), Some(0));

        let mut empty = Listbox::new();
        empty.open(0, None);
        assert!(empty.is_open());
        assert_eq!(empty.active(), None);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut listbox = Listbox::new();
        listbox.open(3, None);

        assert!(!listbox.navigate(Navigation::Up, 3));
        assert_eq!(listbox.active(), Some(0));
        listbox.navigate(Navigation::Down, 3);
        listbox.navigate(Navigation::Down, 3);
        assert!(!listbox.navigate(Navigation::Down, 3));
        assert_eq!(listbox.active(), Some(2));
        listbox.navigate(Navigation::Home, 3);
        assert_eq!(listbox.active(), Some(0));
        listbox.navigate(Navigation::End, 3);
        assert_eq!(listbox.active(), Some(2));
    }

    #[test]
    fn test_close_and_focus_requests() {
        let mut listbox = Listbox::new();
        listbox.open(2, None);
        listbox.clear_focus_request();

        assert!(listbox.close(listbox_events::ESCAPE, true));
        assert_eq!(listbox.focus_request(), Some(FocusRequest::Button));
        assert_eq!(listbox.active(), None);
        assert!(!listbox.close(listbox_events::BLUR, false));

        listbox.toggle(2, Some(1));
        assert!(listbox.force_close());
        assert_eq!(listbox.focus_request(), None);
    }

    #[test]
    fn test_closed_list_ignores_active_changes() {
        let mut listbox = Listbox::new();
        assert!(!listbox.set_active(0, 2));
        assert!(!listbox.navigate(Navigation::Down, 2));
        assert_eq!(listbox.active(), None);
    }
}
