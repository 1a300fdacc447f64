//! Layout tree management

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use taffy::prelude::*;

use crate::element::ElementBounds;

new_key_type! {
    pub struct LayoutNodeId;
}

/// Errors surfaced by the layout engine
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout engine error: {0}")]
    Engine(String),

    #[error("unknown layout node {0:?}")]
    UnknownNode(LayoutNodeId),
}

impl From<taffy::TaffyError> for LayoutError {
    fn from(err: taffy::TaffyError) -> Self {
        LayoutError::Engine(format!("{err:?}"))
    }
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Maps between Mandats node IDs and Taffy node IDs
///
/// Text leaves carry explicit sizes, so no measure function is installed.
pub struct LayoutTree {
    taffy: TaffyTree<()>,
    node_map: SlotMap<LayoutNodeId, NodeId>,
    /// Reverse mapping from Taffy NodeId to our LayoutNodeId
    reverse_map: FxHashMap<NodeId, LayoutNodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_map: SlotMap::with_key(),
            reverse_map: FxHashMap::default(),
        }
    }

    /// Create a new layout node with the given style
    pub fn create_node(&mut self, style: Style) -> Result<LayoutNodeId> {
        let taffy_node = self.taffy.new_leaf(style)?;
        let id = self.node_map.insert(taffy_node);
        self.reverse_map.insert(taffy_node, id);
        Ok(id)
    }

    fn taffy_node(&self, id: LayoutNodeId) -> Result<NodeId> {
        self.node_map
            .get(id)
            .copied()
            .ok_or(LayoutError::UnknownNode(id))
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<()> {
        let parent_node = self.taffy_node(parent)?;
        let child_node = self.taffy_node(child)?;
        self.taffy.add_child(parent_node, child_node)?;
        Ok(())
    }

    /// Compute layout for a tree rooted at the given node
    pub fn compute_layout(
        &mut self,
        root: LayoutNodeId,
        available_space: Size<AvailableSpace>,
    ) -> Result<()> {
        let taffy_node = self.taffy_node(root)?;
        self.taffy.compute_layout(taffy_node, available_space)?;
        Ok(())
    }

    /// Get the computed layout for a node
    pub fn get_layout(&self, id: LayoutNodeId) -> Option<&Layout> {
        self.node_map
            .get(id)
            .and_then(|&taffy_node| self.taffy.layout(taffy_node).ok())
    }

    /// Get computed layout as ElementBounds with parent offset
    pub fn get_bounds(&self, id: LayoutNodeId, parent_offset: (f32, f32)) -> Option<ElementBounds> {
        self.get_layout(id)
            .map(|layout| ElementBounds::from_layout(layout, parent_offset))
    }

    /// Get children of a layout node
    pub fn children(&self, parent: LayoutNodeId) -> Vec<LayoutNodeId> {
        let Some(&taffy_node) = self.node_map.get(parent) else {
            return Vec::new();
        };

        let Ok(children) = self.taffy.children(taffy_node) else {
            return Vec::new();
        };

        children
            .iter()
            .filter_map(|child_taffy| self.reverse_map.get(child_taffy).copied())
            .collect()
    }

    /// Check if a node exists in this tree
    pub fn node_exists(&self, id: LayoutNodeId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Get the number of nodes in the tree
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}
