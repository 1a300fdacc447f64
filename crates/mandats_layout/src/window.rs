//! Headless window host
//!
//! `Window` owns the viewport, document scroll and the current frame. It
//! re-lays out the mounted tree when scrolled or resized, notifies keyed
//! window listeners, and routes pointer and keyboard input through the
//! `EventRouter`.

use std::rc::Rc;

use indexmap::IndexMap;
use mandats_core::{KeyCode, Modifiers, Point, Size};

use crate::div::Div;
use crate::event_router::EventRouter;
use crate::renderer::RenderTree;
use crate::tree::Result;

/// Window-level notifications
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowEvent {
    /// Document scrolled to a new offset
    Scroll(Point),
    /// Viewport changed size
    Resize(Size),
}

/// Listener for window events
pub type WindowListener = Rc<dyn Fn(&WindowEvent)>;

/// A viewport hosting one mounted element tree
pub struct Window {
    viewport: Size,
    scroll: Point,
    root: Option<Div>,
    tree: Option<RenderTree>,
    router: EventRouter,
    listeners: IndexMap<String, WindowListener>,
}

impl Window {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll: Point::ZERO,
            root: None,
            tree: None,
            router: EventRouter::new(),
            listeners: IndexMap::new(),
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Current frame, if anything is mounted
    pub fn tree(&self) -> Option<&RenderTree> {
        self.tree.as_ref()
    }

    /// Lay out `root` and make it the current frame
    pub fn mount(&mut self, root: Div) -> Result<&RenderTree> {
        self.root = Some(root);
        self.relayout()
    }

    fn relayout(&mut self) -> Result<&RenderTree> {
        let Some(root) = self.root.as_ref() else {
            return Err(crate::tree::LayoutError::Engine("nothing mounted".into()));
        };
        let tree = RenderTree::build(root, self.viewport, self.scroll)?;
        self.router.sync(&tree);
        let tree: &RenderTree = self.tree.insert(tree);
        Ok(tree)
    }

    /// Drop the mounted tree
    pub fn unmount(&mut self) {
        self.root = None;
        self.tree = None;
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Resize the viewport, re-layout and notify listeners
    pub fn resize(&mut self, viewport: Size) -> Result<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        if self.root.is_some() {
            self.relayout()?;
        }
        self.notify(&WindowEvent::Resize(viewport));
        Ok(())
    }

    /// Scroll the document, re-layout and notify listeners
    ///
    /// Offsets are clamped at zero.
    pub fn scroll_to(&mut self, offset: Point) -> Result<()> {
        let offset = Point::new(offset.x.max(0.0), offset.y.max(0.0));
        if offset == self.scroll {
            return Ok(());
        }
        self.scroll = offset;
        if self.root.is_some() {
            self.relayout()?;
        }
        self.notify(&WindowEvent::Scroll(offset));
        Ok(())
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) -> Result<()> {
        self.scroll_to(Point::new(self.scroll.x + dx, self.scroll.y + dy))
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a window listener under `key`, replacing any previous one
    pub fn on_window_event(&mut self, key: impl Into<String>, listener: WindowListener) {
        self.listeners.insert(key.into(), listener);
    }

    /// Remove the listener registered under `key`
    pub fn remove_window_listener(&mut self, key: &str) -> bool {
        self.listeners.shift_remove(key).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, event: &WindowEvent) {
        for listener in self.listeners.values() {
            listener(event);
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn focused(&self) -> Option<&str> {
        self.router.focused()
    }

    /// Focus an element of the current frame by id
    pub fn focus(&mut self, id: &str) -> bool {
        let Some(tree) = self.tree.as_ref() else {
            return false;
        };
        if !tree.contains(id) {
            return false;
        }
        self.router.set_focus(tree, Some(id.to_string()));
        true
    }

    /// Click the center of an element
    ///
    /// Returns false when the element is not in the current frame.
    pub fn click(&mut self, id: &str) -> bool {
        let Some(center) = self.center_of(id) else {
            tracing::warn!(id, "click on element that is not mounted");
            return false;
        };
        self.click_at(center);
        true
    }

    /// Press and release the pointer at a viewport position
    pub fn click_at(&mut self, point: Point) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        self.router.on_pointer_move(tree, point);
        self.router.on_pointer_down(tree, point);
        self.router.on_pointer_up(tree, point);
    }

    /// Move the pointer over the center of an element
    pub fn hover(&mut self, id: &str) -> bool {
        let Some(center) = self.center_of(id) else {
            return false;
        };
        self.pointer_move(center);
        true
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(tree) = self.tree.as_ref() {
            self.router.on_pointer_move(tree, point);
        }
    }

    /// Press a key on the focused element
    pub fn key_down(&mut self, key: KeyCode) -> bool {
        self.key_down_with(key, Modifiers::NONE)
    }

    pub fn key_down_with(&mut self, key: KeyCode, modifiers: Modifiers) -> bool {
        match self.tree.as_ref() {
            Some(tree) => self.router.on_key_down(tree, key, modifiers),
            None => false,
        }
    }

    fn center_of(&self, id: &str) -> Option<Point> {
        let bounds = self.tree.as_ref()?.find(id)?.bounds.to_rect();
        Some(Point::new(
            bounds.x() + bounds.width() / 2.0,
            bounds.y() + bounds.height() / 2.0,
        ))
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("viewport", &self.viewport)
            .field("scroll", &self.scroll)
            .field("tree", &self.tree)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}
