//! Host collaborators
//!
//! The editor around the engine: it rebuilds the live document from
//! persisted state, owns the selection, and re-renders component instances.
//! Provides:
//! - DocumentHost trait: interface the variant lifecycle drives
//! - FileHost: reloads the document from a JSON file
//! - mock::MockHost: in-process recording host for tests

pub mod mock;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::tree::{Document, LoadedDocument, NodeId, TreeError};

pub use mock::{HostCall, MockHost};

/// Editor operations the engine depends on
pub trait DocumentHost {
    /// Rebuild the current document from persisted state
    fn reload_current_document(&mut self) -> Result<LoadedDocument, HostError>;

    /// Select a node in the editor
    fn select_node(&mut self, document: &Document, node: NodeId);

    /// Re-render a component instance from its data, then select
    /// `select_ref` if given
    fn recompose(
        &mut self,
        document: &Document,
        node: NodeId,
        select_ref: Option<&str>,
    ) -> Result<(), HostError>;
}

/// Host errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Reload failed: {0}")]
    ReloadFailed(String),

    #[error("Recompose failed: {0}")]
    RecomposeFailed(String),

    #[error("Document error: {0}")]
    Document(#[from] TreeError),
}

/// Host reading the document from a JSON file on every reload
#[derive(Debug, Clone)]
pub struct FileHost {
    path: PathBuf,
    selected: Option<NodeId>,
}

impl FileHost {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            selected: None,
        }
    }

    /// The document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently selected node
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }
}

impl DocumentHost for FileHost {
    fn reload_current_document(&mut self) -> Result<LoadedDocument, HostError> {
        self.selected = None;
        Ok(Document::load(&self.path)?)
    }

    fn select_node(&mut self, document: &Document, node: NodeId) {
        debug!(node = ?document.node(node).map(|found| &found.style_ref), "selected node");
        self.selected = Some(node);
    }

    fn recompose(
        &mut self,
        document: &Document,
        node: NodeId,
        select_ref: Option<&str>,
    ) -> Result<(), HostError> {
        // rendering happens in the editor; the file host only tracks selection
        if let Some(selected) = select_ref.and_then(|reference| document.node_by_ref(reference)) {
            self.select_node(document, selected);
        }
        debug!(node = ?document.node(node).map(|found| &found.style_ref), "recompose requested");
        Ok(())
    }
}
