//! Frame location
//!
//! Walks from a node up through enclosing component boundaries and returns
//! the chain of component frames, outermost first. Override storage nests
//! each frame's overrides under its parent frame, so this order is the order
//! in which storage is descended.
//!
//! Holes: content projected through a hole belongs to the component that
//! provided it, not to the component that declared the hole. When the walk
//! meets a hole it skips the hole's owning component and continues from that
//! component's parent.

use override_model::ComponentData;
use serde::{Deserialize, Serialize};

use crate::tree::{Document, NodeId, NodeKind};

/// What a lookup addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// An element inside a component (keyed by its style ref)
    Element,
    /// A component instance (keyed by its instance ref)
    Component,
}

/// One component in the ancestor chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub node: NodeId,

    /// Copy of the component's data; write back explicitly after edits
    pub data: ComponentData,

    /// A component with no enclosing component
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub top_level: bool,
}

impl Frame {
    fn new(document: &Document, node: NodeId) -> Option<Self> {
        document.component_data(node).map(|data| Self {
            node,
            data: data.clone(),
            top_level: false,
        })
    }
}

/// Locate the frame chain for `node`.
///
/// - `Element`: the node must belong to a component. A root contributes
///   itself, a hole contributes its owning component, a plain element
///   contributes nothing; the walk then continues upward.
/// - `Component`: a nested instance yields its enclosing components (not
///   itself); a top-level instance yields a single frame flagged `top_level`.
///
/// Returns None when the node has no component association in this mode.
pub fn locate_frames(document: &Document, node: NodeId, mode: Mode) -> Option<Vec<Frame>> {
    let frames = match mode {
        Mode::Element if document.belongs_to_component(node) => element_frames(document, node),
        Mode::Component if document.is_component_root(node) => {
            if document.is_component_element(node) {
                let mut frames = Vec::new();
                walk_components(document, document.parent(node), &mut frames);
                frames
            } else {
                let mut frame = Frame::new(document, node)?;
                frame.top_level = true;
                vec![frame]
            }
        }
        Mode::Element | Mode::Component => return None,
    };

    if frames.is_empty() {
        None
    } else {
        Some(frames)
    }
}

/// Frames collected innermost first, returned outermost first
fn element_frames(document: &Document, node: NodeId) -> Vec<Frame> {
    let mut frames = Vec::new();
    let Some(current) = document.node(node) else {
        return frames;
    };
    match &current.kind {
        NodeKind::Root(_) => {
            frames.extend(Frame::new(document, node));
            walk_components(document, document.parent(node), &mut frames);
        }
        NodeKind::Hole => {
            if let Some(component) = document.closest_component(node) {
                frames.extend(Frame::new(document, component));
                walk_components(document, document.parent(component), &mut frames);
            }
        }
        NodeKind::Element => walk_components(document, Some(node), &mut frames),
    }
    frames.reverse();
    frames
}

fn walk_components(document: &Document, start: Option<NodeId>, frames: &mut Vec<Frame>) {
    let mut cursor = start;
    while let Some(current) = cursor {
        let Some(found) = document.closest_component_or_hole(current) else {
            return;
        };
        let Some(found_node) = document.node(found) else {
            return;
        };
        match &found_node.kind {
            NodeKind::Hole => {
                cursor = document
                    .closest_component(found)
                    .and_then(|owner| document.parent(owner));
            }
            NodeKind::Root(data) => {
                frames.push(Frame {
                    node: found,
                    data: data.clone(),
                    top_level: false,
                });
                if !document.is_component_element(found) {
                    return;
                }
                cursor = document.parent(found);
            }
            NodeKind::Element => return,
        }
    }
}
