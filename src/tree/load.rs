//! Document loading from JSON.
//!
//! ```json
//! {
//!   "components": { "component/card.html": { "variants": {} } },
//!   "root": {
//!     "ref": "body",
//!     "children": [
//!       { "kind": "root", "ref": "e0card1", "data": { "ref": "e0card1", "file": "component/card.html" },
//!         "children": [ { "ref": "e0title", "componentElement": true } ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Master records may also be embedded as `data.main`; they are moved out of
//! the instance data into the returned master table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use override_model::{ComponentData, MasterRecord};
use serde::Deserialize;
use tracing::debug;

use super::{Document, NodeId, NodeKind};

/// Errors from building or editing a document tree
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Component root {0} has no data")]
    MissingData(String),

    #[error("Node {0} is not a component root")]
    NotAComponent(String),

    #[error("No node with index {0} in this document")]
    UnknownNode(usize),
}

/// A parsed document plus the master records it carried
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub masters: BTreeMap<String, MasterRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindSpec {
    #[default]
    Element,
    Root,
    Hole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeSpec {
    #[serde(rename = "ref", default)]
    style_ref: String,
    #[serde(default)]
    kind: KindSpec,
    #[serde(default)]
    component_element: bool,
    #[serde(default)]
    data: Option<ComponentData>,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
struct DocumentSpec {
    #[serde(default)]
    components: BTreeMap<String, MasterRecord>,
    root: NodeSpec,
}

impl Document {
    /// Parse a document from its JSON form
    pub fn from_json(json: &str) -> Result<LoadedDocument, TreeError> {
        let spec: DocumentSpec = serde_json::from_str(json)?;
        let mut masters = spec.components;
        let mut document = Document::new();
        build(&mut document, None, spec.root, &mut masters)?;

        debug!(
            nodes = document.descendants().len(),
            masters = masters.len(),
            "loaded document"
        );
        Ok(LoadedDocument { document, masters })
    }

    /// Read and parse a document file
    pub fn load(path: &Path) -> Result<LoadedDocument, TreeError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn build(
    document: &mut Document,
    parent: Option<NodeId>,
    spec: NodeSpec,
    masters: &mut BTreeMap<String, MasterRecord>,
) -> Result<NodeId, TreeError> {
    let mut style_ref = spec.style_ref;
    let kind = match spec.kind {
        KindSpec::Element => NodeKind::Element,
        KindSpec::Hole => NodeKind::Hole,
        KindSpec::Root => {
            let mut data = spec
                .data
                .ok_or_else(|| TreeError::MissingData(style_ref.clone()))?;
            if let Some(main) = data.main.take() {
                masters.entry(data.file.clone()).or_insert(main);
            }
            if style_ref.is_empty() {
                style_ref = data.instance_ref.clone();
            }
            NodeKind::Root(data)
        }
    };

    let id = document.add_node(parent, style_ref, kind, spec.component_element);
    for child in spec.children {
        build(document, Some(id), child, masters)?;
    }
    Ok(id)
}
