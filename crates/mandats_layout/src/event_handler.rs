//! Event handler storage for layout elements
//!
//! Handlers are attached to a `Div` while building the UI and copied into
//! the `RenderTree`. The `Window` routes input to them, bubbling from the
//! target up through its ancestors until a handler stops propagation.
//!
//! ```text
//! Div::on_click(|ctx| ...)
//!     ↓ stored in EventHandlers
//! RenderTree (handlers per node)
//!     ↓ Window::click / key_down
//! target → parent → ... → root  (until stop_propagation)
//! ```

use std::cell::Cell;
use std::rc::Rc;

use mandats_core::{EventType, KeyCode, Modifiers, Point, Rect};
use smallvec::SmallVec;

/// Callback for handling events
///
/// Uses Rc since UI is single-threaded.
pub type EventCallback = Rc<dyn Fn(&EventContext)>;

/// Context passed to event handlers
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The type of event that occurred
    pub event_type: EventType,
    /// Element the event was dispatched to
    pub target: Option<String>,
    /// Element whose handler is running
    pub current_target: Option<String>,
    /// Pointer position (viewport coordinates)
    pub pointer: Point,
    /// Bounds of the current target (viewport coordinates)
    pub bounds: Rect,
    /// Key for KEY_DOWN events
    pub key: Option<KeyCode>,
    pub modifiers: Modifiers,
    /// For FOCUS/BLUR: the element losing or gaining focus on the other side
    pub related_target: Option<String>,
    propagation_stopped: Rc<Cell<bool>>,
    default_prevented: Rc<Cell<bool>>,
}

impl EventContext {
    /// Create a new event context
    pub fn new(event_type: EventType, target: Option<String>) -> Self {
        Self {
            event_type,
            current_target: target.clone(),
            target,
            pointer: Point::ZERO,
            bounds: Rect::ZERO,
            key: None,
            modifiers: Modifiers::NONE,
            related_target: None,
            propagation_stopped: Rc::new(Cell::new(false)),
            default_prevented: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_key(mut self, key: KeyCode, modifiers: Modifiers) -> Self {
        self.key = Some(key);
        self.modifiers = modifiers;
        self
    }

    pub fn with_related_target(mut self, related: Option<String>) -> Self {
        self.related_target = related;
        self
    }

    /// Copy of this context for a handler on another node of the bubble path
    ///
    /// Propagation and default flags are shared with the original.
    pub(crate) fn for_current_target(&self, current: Option<String>, bounds: Rect) -> Self {
        let mut ctx = self.clone();
        ctx.current_target = current;
        ctx.bounds = bounds;
        ctx
    }

    /// Stop the event from reaching ancestor handlers
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Suppress the host's default action (e.g. Tab focus traversal)
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Handlers registered on one element
#[derive(Clone, Default)]
pub struct EventHandlers {
    handlers: SmallVec<[(EventType, EventCallback); 2]>,
}

impl std::fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<EventType> = self.handlers.iter().map(|(t, _)| *t).collect();
        f.debug_struct("EventHandlers")
            .field("event_types", &types)
            .finish()
    }
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event type
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.handlers.push((event_type, Rc::new(handler)));
    }

    /// Whether any handler listens for `event_type`
    pub fn has_handler(&self, event_type: EventType) -> bool {
        self.handlers.iter().any(|(t, _)| *t == event_type)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every handler registered for the context's event type
    ///
    /// Returns the number of handlers that ran.
    pub fn dispatch(&self, ctx: &EventContext) -> usize {
        let mut ran = 0;
        for (event_type, handler) in &self.handlers {
            if *event_type == ctx.event_type {
                handler(ctx);
                ran += 1;
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandats_core::event_types;

    #[test]
    fn test_dispatch_matches_event_type() {
        let hits = Rc::new(Cell::new(0));
        let mut handlers = EventHandlers::new();
        let h = hits.clone();
        handlers.on(event_types::CLICK, move |_| h.set(h.get() + 1));

        let ran = handlers.dispatch(&EventContext::new(event_types::CLICK, None));
        assert_eq!(ran, 1);
        let ran = handlers.dispatch(&EventContext::new(event_types::KEY_DOWN, None));
        assert_eq!(ran, 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stop_propagation_is_shared_across_copies() {
        let ctx = EventContext::new(event_types::CLICK, Some("a".into()));
        let copy = ctx.for_current_target(Some("b".into()), Rect::ZERO);
        copy.stop_propagation();
        assert!(ctx.is_propagation_stopped());
        assert_eq!(copy.current_target.as_deref(), Some("b"));
        assert_eq!(copy.target.as_deref(), Some("a"));
    }
}
