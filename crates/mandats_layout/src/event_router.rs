//! Event routing from host input to layout elements
//!
//! Bridges host-level input (pointer, keyboard) to element-level events:
//!
//! ```text
//! Host input (pointer pressed at x,y / key pressed)
//!     ↓
//! EventRouter (hit testing, hover tracking, focus)
//!     ↓
//! Element events (POINTER_DOWN, CLICK, KEY_DOWN, FOCUS, BLUR, ...)
//!     ↓
//! handlers on the target, bubbling to ancestors
//! ```
//!
//! Frames are rebuilt after every interaction, so the router tracks focus,
//! hover and press targets by element id rather than by layout node.

use mandats_core::{event_types, EventType, KeyCode, Modifiers, Point};

use crate::event_handler::EventContext;
use crate::renderer::RenderTree;
use crate::tree::LayoutNodeId;

/// Routes host input events to elements of the current frame
///
/// Maintains state for:
/// - Current pointer position
/// - Elements currently under the pointer (for enter/leave detection)
/// - Element where the pointer was pressed (for click targeting)
/// - Focused element (receives keyboard events)
#[derive(Debug, Default)]
pub struct EventRouter {
    pointer: Point,
    /// Ids under the pointer, deepest first
    hovered: Vec<String>,
    pressed_target: Option<String>,
    focused: Option<String>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Move focus to `target`, or clear it with `None`
    ///
    /// Sends BLUR to the old element and FOCUS to the new one. Neither
    /// bubbles; each names the other side as `related_target`.
    pub fn set_focus(&mut self, tree: &RenderTree, target: Option<String>) {
        if self.focused == target {
            return;
        }
        let previous = std::mem::replace(&mut self.focused, target.clone());
        tracing::debug!(from = ?previous, to = ?target, "focus changed");

        if let Some(old) = previous.as_deref().and_then(|id| tree.node_by_id(id)) {
            let ctx = EventContext::new(event_types::BLUR, previous.clone())
                .with_related_target(target.clone());
            tree.dispatch_event(old, &ctx);
        }
        if let Some(new) = target.as_deref().and_then(|id| tree.node_by_id(id)) {
            let ctx = EventContext::new(event_types::FOCUS, target.clone())
                .with_related_target(previous);
            tree.dispatch_event(new, &ctx);
        }
    }

    /// Re-sync with a freshly built frame
    ///
    /// Focus on an element that no longer exists is dropped without events;
    /// otherwise an element asking for focus receives it.
    pub fn sync(&mut self, tree: &RenderTree) {
        if let Some(id) = self.focused.as_deref() {
            if !tree.contains(id) {
                tracing::debug!(id, "focused element left the tree");
                self.focused = None;
            }
        }
        self.hovered.retain(|id| tree.contains(id));

        if let Some(node) = tree.auto_focus_node() {
            if let Some(id) = tree.element_id(node).map(str::to_string) {
                self.set_focus(tree, Some(id));
            }
        }
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Handle pointer movement
    ///
    /// Emits POINTER_LEAVE for elements no longer under the pointer, then
    /// POINTER_ENTER for newly entered ones.
    pub fn on_pointer_move(&mut self, tree: &RenderTree, point: Point) {
        self.pointer = point;
        let now: Vec<String> = tree
            .hit_test(point)
            .map(|hit| {
                tree.ancestors(hit)
                    .filter_map(|node| tree.element_id(node).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        for left in self.hovered.iter().filter(|id| !now.contains(id)) {
            self.emit(tree, left, event_types::POINTER_LEAVE, point);
        }
        // Outermost first, like the DOM
        for entered in now.iter().rev().filter(|id| !self.hovered.contains(id)) {
            self.emit(tree, entered, event_types::POINTER_ENTER, point);
        }
        self.hovered = now;
    }

    /// Handle pointer press
    ///
    /// Focus moves to the nearest focusable ancestor of the hit element, or
    /// is cleared when there is none. Then POINTER_DOWN bubbles from the hit.
    pub fn on_pointer_down(&mut self, tree: &RenderTree, point: Point) {
        self.pointer = point;
        let hit = tree.hit_test(point);

        let focus_target = hit.and_then(|hit| {
            tree.ancestors(hit)
                .filter_map(|node| tree.get_render_node(node))
                .find(|node| node.focusable)
                .and_then(|node| node.element_id.clone())
        });
        self.set_focus(tree, focus_target);

        self.pressed_target = hit.and_then(|node| self.nearest_id(tree, node));
        if let Some(hit) = hit {
            self.bubble(tree, hit, event_types::POINTER_DOWN, point);
        }
    }

    /// Handle pointer release
    ///
    /// POINTER_UP bubbles from the hit element; CLICK follows when the
    /// release lands inside the element that was pressed. Anonymous leaves
    /// such as text wrappers press their nearest ancestor with an id.
    pub fn on_pointer_up(&mut self, tree: &RenderTree, point: Point) {
        self.pointer = point;
        let pressed = self.pressed_target.take();
        let Some(hit) = tree.hit_test(point) else {
            return;
        };
        self.bubble(tree, hit, event_types::POINTER_UP, point);

        let pressed_node = pressed.as_deref().and_then(|id| tree.node_by_id(id));
        if pressed_node.is_some_and(|node| tree.is_ancestor(node, hit)) {
            self.bubble(tree, hit, event_types::CLICK, point);
        }
    }

    // =========================================================================
    // Keyboard Events
    // =========================================================================

    /// Handle a key press on the focused element
    ///
    /// KEY_DOWN bubbles from the focused element. Unless a handler prevented
    /// the default, Tab moves focus to the next focusable element (previous
    /// with shift). Returns true when a handler prevented the default.
    pub fn on_key_down(&mut self, tree: &RenderTree, key: KeyCode, modifiers: Modifiers) -> bool {
        let target = self.focused.as_deref().and_then(|id| tree.node_by_id(id));

        let ctx = EventContext::new(event_types::KEY_DOWN, self.focused.clone())
            .with_pointer(self.pointer)
            .with_key(key, modifiers);
        if let Some(target) = target {
            tree.dispatch_event_bubbling(target, &ctx);
        }
        if ctx.is_default_prevented() {
            return true;
        }

        if key == KeyCode::Tab {
            self.move_focus(tree, target, modifiers.shift);
        }
        false
    }

    fn move_focus(&mut self, tree: &RenderTree, from: Option<LayoutNodeId>, backwards: bool) {
        let order: Vec<LayoutNodeId> = tree
            .focusable_nodes()
            .into_iter()
            .filter(|node| tree.element_id(*node).is_some())
            .collect();
        if order.is_empty() {
            return;
        }
        let position = from.and_then(|node| order.iter().position(|n| *n == node));
        let next = match (position, backwards) {
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
            (None, false) => 0,
            (None, true) => order.len() - 1,
        };
        let id = tree.element_id(order[next]).map(str::to_string);
        self.set_focus(tree, id);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn nearest_id(&self, tree: &RenderTree, node: LayoutNodeId) -> Option<String> {
        tree.ancestors(node)
            .find_map(|node| tree.element_id(node))
            .map(str::to_string)
    }

    fn emit(&self, tree: &RenderTree, id: &str, event_type: EventType, point: Point) {
        if let Some(node) = tree.node_by_id(id) {
            let ctx = EventContext::new(event_type, Some(id.to_string())).with_pointer(point);
            tree.dispatch_event(node, &ctx);
        }
    }

    fn bubble(&self, tree: &RenderTree, target: LayoutNodeId, event_type: EventType, point: Point) {
        let ctx = EventContext::new(event_type, tree.element_id(target).map(str::to_string))
            .with_pointer(point);
        tree.dispatch_event_bubbling(target, &ctx);
    }
}
