//! Editing session
//!
//! The explicit document context every mutating operation runs against:
//! the live `Document`, the `MasterRegistry` shared by its instances, the
//! persistence store and the editor host.
//!
//! Operations run one at a time. A transition completes its store call
//! before it touches the registry or asks the host to reload, so a reload
//! always observes what was just written.

mod variants;

use std::path::{Path, PathBuf};

use component_store::ComponentStore;
use override_model::{ComponentData, MasterRecord, OverrideNode, OverrideRecord};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::highlight::{report, EditingSurface, HighlightReport};
use crate::host::DocumentHost;
use crate::locate::{locate_frames, Frame, Mode};
use crate::merge::materialize;
use crate::registry::MasterRegistry;
use crate::resolve::{override_component, resolve_overrides};
use crate::tree::{Document, LoadedDocument, NodeId};

pub use variants::VariantState;

/// A live document with its collaborators
#[derive(Debug)]
pub struct Session<S, H> {
    document: Document,
    registry: MasterRegistry,
    store: S,
    host: H,
    project_root: PathBuf,
}

impl<S: ComponentStore, H: DocumentHost> Session<S, H> {
    /// Start a session on a loaded document
    pub fn new(loaded: LoadedDocument, store: S, host: H) -> Result<Self, EngineError> {
        let registry = MasterRegistry::from_masters(loaded.masters)?;
        Ok(Self {
            document: loaded.document,
            registry,
            store,
            host,
            project_root: PathBuf::from("."),
        })
    }

    /// Start a session on the host's current document, with persisted
    /// masters taking precedence over embedded ones
    pub fn open(store: S, mut host: H) -> Result<Self, EngineError> {
        let loaded = host.reload_current_document()?;
        let mut session = Self::new(loaded, store, host)?;
        session.refresh_masters()?;
        Ok(session)
    }

    /// Set the root that component paths are made relative to
    pub fn with_project_root(mut self, root: impl AsRef<Path>) -> Self {
        self.project_root = root.as_ref().to_path_buf();
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn registry(&self) -> &MasterRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The master record of the component at `node`
    pub fn master_of(&self, node: NodeId) -> Option<&MasterRecord> {
        let data = self.document.component_data(node)?;
        self.registry.get(&data.file)
    }

    /// Frame chain of `node`
    pub fn frames(&self, node: NodeId, mode: Mode) -> Option<Vec<Frame>> {
        locate_frames(&self.document, node, mode)
    }

    /// Materialized overrides addressed by `node`
    pub fn resolve_overrides(&self, node: NodeId, mode: Mode) -> Option<OverrideNode> {
        resolve_overrides(&self.document, &self.registry, node, mode)
    }

    /// Materialized overrides of the instance at `node` itself
    pub fn materialize(&self, node: NodeId) -> Option<OverrideRecord> {
        let data = self.document.component_data(node)?;
        Some(materialize(data, self.registry.get(&data.file)))
    }

    /// Which fields of `surface` show overridden or deleted values for `node`
    pub fn highlight(
        &self,
        node: NodeId,
        mode: Mode,
        surface: &EditingSurface,
    ) -> Option<HighlightReport> {
        let overrides = self.resolve_overrides(node, mode)?;
        Some(report(&overrides, surface))
    }

    /// Store `key = value` for the nested instance at `node` in its
    /// enclosing components' raw overrides.
    pub fn override_component(
        &mut self,
        node: NodeId,
        key: &str,
        value: Value,
    ) -> Result<Option<Vec<Frame>>, EngineError> {
        Ok(override_component(&mut self.document, node, key, value)?)
    }

    /// Live instances resolving against the master of `file`
    pub fn instances_sharing(&self, file: &str) -> Vec<NodeId> {
        self.document.instances_of(file)
    }

    /// Rebuild the document from persisted state and select `reference`.
    ///
    /// Returns the selected node, or None when the ref no longer exists.
    pub fn reload_and_select(&mut self, reference: &str) -> Result<Option<NodeId>, EngineError> {
        let loaded = self.host.reload_current_document()?;
        self.registry = MasterRegistry::from_masters(loaded.masters)?;
        self.document = loaded.document;
        self.refresh_masters()?;

        let node = self.document.node_by_ref(reference);
        match node {
            Some(node) => self.host.select_node(&self.document, node),
            None => warn!(reference, "node not found after reload"),
        }
        info!(reference, masters = self.registry.len(), "reloaded document");
        Ok(node)
    }

    /// Persisted masters replace whatever the reloaded document embedded
    fn refresh_masters(&mut self) -> Result<(), EngineError> {
        let mut files: Vec<String> = self.registry.files().map(str::to_string).collect();
        for node in self.document.component_roots() {
            if let Some(data) = self.document.component_data(node) {
                if !files.contains(&data.file) {
                    files.push(data.file.clone());
                }
            }
        }

        for file in files {
            if let Some(persisted) = self.store.load_component_data(&file)? {
                self.registry.commit(&file, persisted)?;
            }
        }
        Ok(())
    }

    /// Save a staged master, then install it in the registry.
    ///
    /// Nothing is installed when the save fails.
    fn persist_master(&mut self, file: &str, staged: MasterRecord) -> Result<(), EngineError> {
        self.store.save_component_data(file, &staged)?;
        let changed = self.registry.commit(file, staged)?;
        debug!(
            file,
            changed,
            instances = self.document.instances_of(file).len(),
            "committed master"
        );
        Ok(())
    }

    /// A copy of the component data at `node`
    fn component(&self, node: NodeId) -> Result<ComponentData, EngineError> {
        self.document
            .component_data(node)
            .cloned()
            .ok_or(EngineError::NotAComponent(node))
    }
}
