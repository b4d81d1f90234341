//! Component document tree
//!
//! An arena of nodes addressed by `NodeId`. Each node is one of:
//! - `Element`: a plain element (possibly rendered from a component)
//! - `Root`: a component instance root carrying its `ComponentData`
//! - `Hole`: where a component renders content projected from outside
//!
//! Removed nodes stay in the arena but are detached from their parent, so
//! every lookup walks the live tree from the document root.

mod load;

use override_model::ComponentData;
use serde::Serialize;

pub use load::{LoadedDocument, TreeError};

/// Index of a node in its document.
///
/// Ids are only handed out by `Document`. An id kept across a reload may
/// no longer exist; lookups on it return None.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is, with the data relevant to that kind
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element,
    Root(ComponentData),
    Hole,
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Stable style reference (`e0...`)
    pub style_ref: String,

    /// The node was rendered from a component definition.
    ///
    /// Set for elements inside a component and for component instances
    /// nested in another component; unset for top-level instances.
    pub component_element: bool,

    pub kind: NodeKind,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A live document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// The document root, once one has been added
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Add a node under `parent`, or as the document root when `parent` is None.
    ///
    /// Adding a second parentless node replaces the document root. A parent
    /// that is not in this document leaves the node detached.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        style_ref: impl Into<String>,
        kind: NodeKind,
        component_element: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            style_ref: style_ref.into(),
            component_element,
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(parent.0) {
                    parent.children.push(id);
                }
            }
            None => self.root = Some(id),
        }
        id
    }

    /// Place a new instance of the component at `file` under `parent`.
    ///
    /// The instance ref doubles as the root's style ref. `component_element`
    /// marks an instance placed inside another component's definition.
    pub fn place_component(
        &mut self,
        parent: Option<NodeId>,
        file: impl Into<String>,
        component_element: bool,
    ) -> NodeId {
        let data = ComponentData::new(file);
        let style_ref = data.instance_ref.clone();
        self.add_node(parent, style_ref, NodeKind::Root(data), component_element)
    }

    /// Detach a node (and its subtree) from the live tree
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if let Some(parent) = node.parent.take() {
            if let Some(parent) = self.nodes.get_mut(parent.0) {
                parent.children.retain(|child| *child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// The node at `id`, None for an id this document never issued
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn is_component_root(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| matches!(node.kind, NodeKind::Root(_)))
    }

    pub fn is_component_hole(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| matches!(node.kind, NodeKind::Hole))
    }

    pub fn is_component_element(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.component_element)
    }

    /// Root, hole, or an element rendered from a component
    pub fn belongs_to_component(&self, id: NodeId) -> bool {
        self.is_component_root(id) || self.is_component_hole(id) || self.is_component_element(id)
    }

    /// The component data stored on a root
    pub fn component_data(&self, id: NodeId) -> Option<&ComponentData> {
        match &self.node(id)?.kind {
            NodeKind::Root(data) => Some(data),
            NodeKind::Element | NodeKind::Hole => None,
        }
    }

    /// Replace the component data stored on a root
    pub fn set_component_data(&mut self, id: NodeId, data: ComponentData) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(TreeError::UnknownNode(id.0))?;
        match &mut node.kind {
            NodeKind::Root(current) => {
                *current = data;
                Ok(())
            }
            NodeKind::Element | NodeKind::Hole => {
                Err(TreeError::NotAComponent(node.style_ref.clone()))
            }
        }
    }

    /// Nearest component root, starting with `id` itself
    pub fn closest_component(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&node| self.is_component_root(node))
    }

    /// Nearest component root or hole, starting with `id` itself
    pub fn closest_component_or_hole(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&node| self.is_component_root(node) || self.is_component_hole(node))
    }

    /// `id` followed by its ancestors up to the document root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&node| self.parent(node))
    }

    /// Live nodes in document order
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Live component roots in document order
    pub fn component_roots(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&id| self.is_component_root(id))
            .collect()
    }

    /// Live component roots instantiating `file`
    pub fn instances_of(&self, file: &str) -> Vec<NodeId> {
        self.component_roots()
            .into_iter()
            .filter(|&id| self.component_data(id).is_some_and(|data| data.file == file))
            .collect()
    }

    /// Find a live node by style ref or component instance ref
    pub fn node_by_ref(&self, reference: &str) -> Option<NodeId> {
        self.descendants().into_iter().find(|&id| {
            self.node(id).is_some_and(|node| node.style_ref == reference)
                || self
                    .component_data(id)
                    .is_some_and(|data| data.instance_ref == reference)
        })
    }
}
