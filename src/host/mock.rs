//! Recording host for tests.

use crate::tree::{Document, LoadedDocument, NodeId};

use super::{DocumentHost, HostError};

/// A host call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Reload,
    Select(NodeId),
    Recompose {
        node: NodeId,
        select_ref: Option<String>,
    },
}

/// Host returning a fixed persisted document on reload and recording calls
#[derive(Debug, Default)]
pub struct MockHost {
    persisted: Option<LoadedDocument>,
    calls: Vec<HostCall>,
    fail_next_reload: bool,
}

impl MockHost {
    /// Create a host with nothing to reload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host that reloads `persisted`
    pub fn with_document(persisted: LoadedDocument) -> Self {
        Self {
            persisted: Some(persisted),
            ..Default::default()
        }
    }

    /// Replace the document returned by the next reloads
    pub fn set_persisted(&mut self, persisted: LoadedDocument) {
        self.persisted = Some(persisted);
    }

    /// Calls observed so far, in order
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of reloads observed
    pub fn reloads(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Reload))
            .count()
    }

    /// The node passed to the most recent selection
    pub fn last_selected(&self) -> Option<NodeId> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Select(node) => Some(*node),
            _ => None,
        })
    }

    /// Make the next reload fail
    pub fn fail_next_reload(&mut self) {
        self.fail_next_reload = true;
    }
}

impl DocumentHost for MockHost {
    fn reload_current_document(&mut self) -> Result<LoadedDocument, HostError> {
        self.calls.push(HostCall::Reload);
        if std::mem::take(&mut self.fail_next_reload) {
            return Err(HostError::ReloadFailed("injected failure".to_string()));
        }
        self.persisted
            .clone()
            .ok_or_else(|| HostError::ReloadFailed("no persisted document".to_string()))
    }

    fn select_node(&mut self, _document: &Document, node: NodeId) {
        self.calls.push(HostCall::Select(node));
    }

    fn recompose(
        &mut self,
        _document: &Document,
        node: NodeId,
        select_ref: Option<&str>,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::Recompose {
            node,
            select_ref: select_ref.map(str::to_string),
        });
        Ok(())
    }
}
