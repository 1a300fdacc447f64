//! RenderTree - bridges layout computation and event dispatch
//!
//! A `RenderTree` is one laid-out frame of a `Div` tree:
//!
//! ```text
//! Div (builder)
//!     ↓ RenderTree::build(root, viewport, scroll)
//! LayoutTree (taffy)  +  RenderNode per element
//!     ↓ compute_layout
//! viewport-relative ElementBounds per node
//! ```
//!
//! Elements marked with `Div::fixed_at` form the fixed layer. They are laid
//! out as separate roots at their viewport position and ignore document
//! scroll, while event bubbling still follows their logical parent.

use std::fmt::Write as _;

use indexmap::IndexMap;
use mandats_core::{Point, Rect, Size};
use rustc_hash::FxHashMap;
use taffy::prelude::TaffyMaxContent;

use crate::div::Div;
use crate::element::{ElementBounds, RenderProps, TextContent};
use crate::event_handler::{EventContext, EventHandlers};
use crate::popper::ElementGeometry;
use crate::tree::{LayoutNodeId, LayoutTree, Result};

/// Layer a node is painted and hit-tested in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    /// Document flow, moves with scroll
    #[default]
    Document,
    /// Viewport-anchored layer (popups), drawn and hit-tested first
    Fixed,
}

/// Render data for one element of the frame
#[derive(Clone, Debug)]
pub struct RenderNode {
    pub element_id: Option<String>,
    pub parent: Option<LayoutNodeId>,
    pub children: Vec<LayoutNodeId>,
    /// Viewport-relative bounds
    pub bounds: ElementBounds,
    pub classes: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub text: Option<TextContent>,
    pub props: RenderProps,
    pub layer: RenderLayer,
    pub focusable: bool,
    pub auto_focus: bool,
    handlers: EventHandlers,
}

impl RenderNode {
    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A laid-out frame
pub struct RenderTree {
    layout_tree: LayoutTree,
    /// Render data for each node (tree order)
    render_nodes: IndexMap<LayoutNodeId, RenderNode>,
    root: Option<LayoutNodeId>,
    /// Fixed layer roots with their viewport origin (tree order)
    fixed_roots: Vec<(LayoutNodeId, Point)>,
    ids: FxHashMap<String, LayoutNodeId>,
    viewport: Size,
    scroll: Point,
}

impl RenderTree {
    /// Lay out `root` for a viewport scrolled by `scroll`
    pub fn build(root: &Div, viewport: Size, scroll: Point) -> Result<Self> {
        use taffy::prelude::{AvailableSpace, Dimension, Display, FlexDirection, Style};

        let mut tree = Self {
            layout_tree: LayoutTree::new(),
            render_nodes: IndexMap::new(),
            root: None,
            fixed_roots: Vec::new(),
            ids: FxHashMap::default(),
            viewport,
            scroll,
        };

        // The document is as wide as the viewport and as tall as its content
        let document = tree.layout_tree.create_node(Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: taffy::prelude::Size {
                width: Dimension::Length(viewport.width),
                height: Dimension::Auto,
            },
            ..Default::default()
        })?;

        let root_id = tree.build_element(root, None, document, false)?;
        tree.root = Some(root_id);

        tree.layout_tree.compute_layout(
            document,
            taffy::prelude::Size {
                width: AvailableSpace::Definite(viewport.width),
                height: AvailableSpace::MaxContent,
            },
        )?;
        for (layer_root, _) in tree.fixed_roots.clone() {
            tree.layout_tree
                .compute_layout(layer_root, taffy::prelude::Size::MAX_CONTENT)?;
        }

        tree.place_nodes();

        tracing::debug!(
            nodes = tree.render_nodes.len(),
            fixed = tree.fixed_roots.len(),
            width = viewport.width,
            height = viewport.height,
            "render tree built"
        );
        Ok(tree)
    }

    /// Recursively build elements into the tree
    fn build_element(
        &mut self,
        element: &Div,
        parent: Option<LayoutNodeId>,
        layout_parent: LayoutNodeId,
        parent_invisible: bool,
    ) -> Result<LayoutNodeId> {
        let node_id = self.layout_tree.create_node(element.style().clone())?;

        let layer = match element.fixed_position() {
            Some(origin) => {
                self.fixed_roots.push((node_id, origin));
                RenderLayer::Fixed
            }
            None => {
                self.layout_tree.add_child(layout_parent, node_id)?;
                parent
                    .and_then(|p| self.render_nodes.get(&p))
                    .map(|p| p.layer)
                    .unwrap_or_default()
            }
        };

        let mut props = element.render_props().clone();
        props.invisible |= parent_invisible;
        let invisible = props.invisible;

        if let Some(id) = element.element_id() {
            if self.ids.contains_key(id) {
                tracing::warn!(id, "duplicate element id, keeping the first occurrence");
            } else {
                self.ids.insert(id.to_string(), node_id);
            }
        }

        self.render_nodes.insert(
            node_id,
            RenderNode {
                element_id: element.element_id().map(str::to_string),
                parent,
                children: Vec::new(),
                bounds: ElementBounds::default(),
                classes: element.classes().to_vec(),
                attributes: element.attributes().clone(),
                text: element.text().cloned(),
                props,
                layer,
                focusable: element.is_focusable(),
                auto_focus: element.wants_focus(),
                handlers: element.handlers().clone(),
            },
        );

        let mut children = Vec::with_capacity(element.child_elements().len());
        for child in element.child_elements() {
            children.push(self.build_element(child, Some(node_id), node_id, invisible)?);
        }
        if let Some(node) = self.render_nodes.get_mut(&node_id) {
            node.children = children;
        }

        Ok(node_id)
    }

    /// Resolve viewport-relative bounds for every node
    fn place_nodes(&mut self) {
        let mut stack: Vec<(LayoutNodeId, (f32, f32))> = Vec::new();
        if let Some(root) = self.root {
            if !self.is_layer_root(root) {
                stack.push((root, (-self.scroll.x, -self.scroll.y)));
            }
        }
        for &(layer_root, origin) in &self.fixed_roots {
            stack.push((layer_root, (origin.x, origin.y)));
        }

        while let Some((node_id, offset)) = stack.pop() {
            let Some(bounds) = self.layout_tree.get_bounds(node_id, offset) else {
                continue;
            };
            let Some(node) = self.render_nodes.get_mut(&node_id) else {
                continue;
            };
            node.bounds = bounds;
            for &child in &node.children {
                if !self.fixed_roots.iter().any(|(id, _)| *id == child) {
                    stack.push((child, (bounds.x, bounds.y)));
                }
            }
        }
    }

    fn is_layer_root(&self, node: LayoutNodeId) -> bool {
        self.fixed_roots.iter().any(|(id, _)| *id == node)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn root(&self) -> Option<LayoutNodeId> {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn layout(&self) -> &LayoutTree {
        &self.layout_tree
    }

    pub fn len(&self) -> usize {
        self.render_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.render_nodes.is_empty()
    }

    /// Look up a node by element id
    pub fn node_by_id(&self, id: &str) -> Option<LayoutNodeId> {
        self.ids.get(id).copied()
    }

    pub fn get_render_node(&self, node: LayoutNodeId) -> Option<&RenderNode> {
        self.render_nodes.get(&node)
    }

    /// Look up render data by element id
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        self.node_by_id(id).and_then(|node| self.render_nodes.get(&node))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn get_bounds(&self, node: LayoutNodeId) -> Option<ElementBounds> {
        self.render_nodes.get(&node).map(|n| n.bounds)
    }

    pub fn element_id(&self, node: LayoutNodeId) -> Option<&str> {
        self.render_nodes
            .get(&node)
            .and_then(|n| n.element_id.as_deref())
    }

    /// Nodes whose `predicate` holds, in tree order
    pub fn find_all(&self, predicate: impl Fn(&RenderNode) -> bool) -> Vec<&RenderNode> {
        self.render_nodes.values().filter(|&node| predicate(node)).collect()
    }

    /// Walk from `node` up to the root (inclusive of `node`)
    pub fn ancestors(&self, node: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(Some(node), move |current| {
            self.render_nodes.get(current).and_then(|n| n.parent)
        })
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: LayoutNodeId, node: LayoutNodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Focusable nodes that can be reached (visible), in tree order
    pub fn focusable_nodes(&self) -> Vec<LayoutNodeId> {
        self.render_nodes
            .iter()
            .filter(|(_, n)| n.focusable && !n.props.invisible)
            .map(|(id, _)| *id)
            .collect()
    }

    /// First node asking for focus on mount
    pub fn auto_focus_node(&self) -> Option<LayoutNodeId> {
        self.render_nodes
            .iter()
            .find(|(_, n)| n.auto_focus && !n.props.invisible)
            .map(|(id, _)| *id)
    }

    /// Concatenated text of a subtree in tree order
    pub fn text_content(&self, node: LayoutNodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: LayoutNodeId, out: &mut String) {
        let Some(render) = self.render_nodes.get(&node) else {
            return;
        };
        if let Some(text) = &render.text {
            out.push_str(&text.content);
        }
        for &child in &render.children {
            self.collect_text(child, out);
        }
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// Find the deepest visible node under `point`
    ///
    /// The fixed layer is checked first (last root on top), then the document.
    pub fn hit_test(&self, point: Point) -> Option<LayoutNodeId> {
        for &(layer_root, _) in self.fixed_roots.iter().rev() {
            if let Some(hit) = self.hit_test_node(layer_root, point) {
                return Some(hit);
            }
        }
        let root = self.root?;
        if self.is_layer_root(root) {
            return None;
        }
        self.hit_test_node(root, point)
    }

    fn hit_test_node(&self, node_id: LayoutNodeId, point: Point) -> Option<LayoutNodeId> {
        let node = self.render_nodes.get(&node_id)?;
        if node.props.invisible || !node.bounds.to_rect().contains(point) {
            return None;
        }

        // Last child is on top
        for &child in node.children.iter().rev() {
            if self.is_layer_root(child) {
                continue;
            }
            if let Some(hit) = self.hit_test_node(child, point) {
                return Some(hit);
            }
        }

        Some(node_id)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run the handlers of `target` only
    pub fn dispatch_event(&self, target: LayoutNodeId, ctx: &EventContext) -> usize {
        let Some(node) = self.render_nodes.get(&target) else {
            return 0;
        };
        let local = ctx.for_current_target(node.element_id.clone(), node.bounds.to_rect());
        node.handlers.dispatch(&local)
    }

    /// Run handlers from `target` up through its ancestors
    ///
    /// Stops after the node whose handler called `stop_propagation`.
    /// Returns the number of handlers that ran.
    pub fn dispatch_event_bubbling(&self, target: LayoutNodeId, ctx: &EventContext) -> usize {
        let mut ran = 0;
        for node_id in self.ancestors(target) {
            let Some(node) = self.render_nodes.get(&node_id) else {
                break;
            };
            if !node.handlers.has_handler(ctx.event_type) {
                continue;
            }
            let local = ctx.for_current_target(node.element_id.clone(), node.bounds.to_rect());
            ran += node.handlers.dispatch(&local);
            if ctx.is_propagation_stopped() {
                break;
            }
        }
        ran
    }

    // =========================================================================
    // Debug output
    // =========================================================================

    /// Indented dump of the frame, one element per line
    ///
    /// ```text
    /// div#pick .relative
    ///   div#pick-button [role=button] "Choose" @0,0 320x38
    /// ```
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.outline_node(root, 0, &mut out);
        }
        out
    }

    fn outline_node(&self, node_id: LayoutNodeId, depth: usize, out: &mut String) {
        let Some(node) = self.render_nodes.get(&node_id) else {
            return;
        };
        if node.props.invisible {
            return;
        }

        let _ = write!(out, "{:indent$}", "", indent = depth * 2);
        match &node.element_id {
            Some(id) => {
                let _ = write!(out, "div#{id}");
            }
            None if node.text.is_some() => out.push_str("text"),
            None => out.push_str("div"),
        }
        for (name, value) in &node.attributes {
            let _ = write!(out, " [{name}={value}]");
        }
        if let Some(text) = &node.text {
            let _ = write!(out, " {:?}", text.content);
        }
        let b = node.bounds.to_rect().round();
        let _ = writeln!(
            out,
            " @{},{} {}x{}",
            b.x(),
            b.y(),
            b.width(),
            b.height()
        );

        for &child in &node.children {
            self.outline_node(child, depth + 1, out);
        }
    }
}

impl ElementGeometry for RenderTree {
    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        self.find(id).map(|node| node.bounds.to_rect())
    }
}

impl std::fmt::Debug for RenderTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTree")
            .field("nodes", &self.render_nodes.len())
            .field("fixed_roots", &self.fixed_roots.len())
            .field("viewport", &self.viewport)
            .field("scroll", &self.scroll)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::div::{div, text};
    use mandats_core::event_types;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn page() -> Div {
        div()
            .id("page")
            .flex_col()
            .child(div().id("header").h(50.0))
            .child(
                div()
                    .id("button")
                    .w(200.0)
                    .h(30.0)
                    .child(text("Pick")),
            )
            .child(div().id("popup").fixed_at(10.0, 100.0).w(120.0).h(60.0))
    }

    #[test]
    fn test_document_bounds_follow_scroll() {
        let tree =
            RenderTree::build(&page(), Size::new(400.0, 300.0), Point::new(0.0, 20.0)).unwrap();
        assert_eq!(tree.bounding_rect("header"), Some(Rect::new(0.0, -20.0, 400.0, 50.0)));
        assert_eq!(tree.bounding_rect("button"), Some(Rect::new(0.0, 30.0, 200.0, 30.0)));
    }

    #[test]
    fn test_fixed_layer_ignores_scroll_and_flow() {
        let tree =
            RenderTree::build(&page(), Size::new(400.0, 300.0), Point::new(0.0, 20.0)).unwrap();
        assert_eq!(tree.bounding_rect("popup"), Some(Rect::new(10.0, 100.0, 120.0, 60.0)));
        let popup = tree.find("popup").unwrap();
        assert_eq!(popup.layer, RenderLayer::Fixed);
        // Still a logical child of the page
        assert_eq!(popup.parent, tree.node_by_id("page"));
    }

    #[test]
    fn test_hit_test_prefers_fixed_layer() {
        let tree = RenderTree::build(&page(), Size::new(400.0, 300.0), Point::ZERO).unwrap();
        let hit = tree.hit_test(Point::new(20.0, 110.0)).unwrap();
        assert_eq!(tree.element_id(hit), Some("popup"));

        let hit = tree.hit_test(Point::new(150.0, 60.0)).unwrap();
        assert_eq!(tree.element_id(hit), Some("button"));
    }

    #[test]
    fn test_invisible_subtree_is_not_hit() {
        let ui = div()
            .id("page")
            .child(
                div()
                    .id("ghost")
                    .fixed_at(0.0, 0.0)
                    .invisible()
                    .child(div().id("inner").size(50.0, 50.0)),
            );
        let tree = RenderTree::build(&ui, Size::new(100.0, 100.0), Point::ZERO).unwrap();
        assert!(tree.find("inner").unwrap().props.invisible);
        let hit = tree.hit_test(Point::new(10.0, 10.0));
        assert_ne!(hit.and_then(|n| tree.element_id(n)), Some("inner"));
    }

    #[test]
    fn test_bubbling_stops_on_request() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let ui = div()
            .id("outer")
            .on_click(move |_| l1.borrow_mut().push("outer"))
            .child(
                div()
                    .id("middle")
                    .on_click(move |ctx| {
                        l2.borrow_mut().push("middle");
                        ctx.stop_propagation();
                    })
                    .child(div().id("inner").size(10.0, 10.0).on_click(move |ctx| {
                        assert_eq!(ctx.target.as_deref(), Some("inner"));
                        l3.borrow_mut().push("inner");
                    })),
            );
        let tree = RenderTree::build(&ui, Size::new(100.0, 100.0), Point::ZERO).unwrap();
        let inner = tree.node_by_id("inner").unwrap();
        let ctx = EventContext::new(event_types::CLICK, Some("inner".into()));
        let ran = tree.dispatch_event_bubbling(inner, &ctx);

        assert_eq!(ran, 2);
        assert_eq!(*log.borrow(), vec!["inner", "middle"]);
    }

    #[test]
    fn test_text_and_outline() {
        let tree = RenderTree::build(&page(), Size::new(400.0, 300.0), Point::ZERO).unwrap();
        let page_node = tree.node_by_id("page").unwrap();
        assert_eq!(tree.text_content(page_node), "Pick");
        let outline = tree.outline();
        assert!(outline.starts_with("div#page"));
        assert!(outline.contains("  div#button @0,50 200x30"));
        assert!(outline.contains("\"Pick\""));
    }
}
