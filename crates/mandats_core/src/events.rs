//! Event type codes and keyboard primitives
//!
//! Element handlers are keyed by `EventType`. The codes are plain `u32`
//! constants so components can extend them with their own ranges (see
//! the listbox events in `mandats_cn`).

/// Numeric event type identifier
pub type EventType = u32;

/// Built-in event codes routed by the layout host
pub mod event_types {
    use super::EventType;

    /// Pointer pressed over an element
    pub const POINTER_DOWN: EventType = 1;
    /// Pointer released over an element
    pub const POINTER_UP: EventType = 2;
    /// Press and release on the same element
    pub const CLICK: EventType = 3;
    /// Pointer entered the element bounds
    pub const POINTER_ENTER: EventType = 4;
    /// Pointer left the element bounds
    pub const POINTER_LEAVE: EventType = 5;
    /// Key pressed while the element (or a descendant) has focus
    pub const KEY_DOWN: EventType = 10;
    /// Element received focus
    pub const FOCUS: EventType = 20;
    /// Element lost focus
    pub const BLUR: EventType = 21;
    /// Window scrolled
    pub const SCROLL: EventType = 30;
    /// Window resized
    pub const RESIZE: EventType = 31;
}

/// Keys the widgets react to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Tab,
    Backspace,
    Char(char),
}

impl KeyCode {
    /// Parse a key name as used in scripted input ("down", "enter", "a", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => KeyCode::ArrowUp,
            "down" | "arrowdown" => KeyCode::ArrowDown,
            "left" | "arrowleft" => KeyCode::ArrowLeft,
            "right" | "arrowright" => KeyCode::ArrowRight,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Space,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Modifier keys held during an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(KeyCode::from_name("down"), Some(KeyCode::ArrowDown));
        assert_eq!(KeyCode::from_name("Escape"), Some(KeyCode::Escape));
        assert_eq!(KeyCode::from_name("x"), Some(KeyCode::Char('x')));
        assert_eq!(KeyCode::from_name("nope"), None);
    }

    #[test]
    fn test_modifiers_any() {
        assert!(!Modifiers::NONE.any());
        assert!(Modifiers {
            shift: true,
            ..Modifiers::NONE
        }
        .any());
    }
}
