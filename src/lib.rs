//! Component override resolution
//!
//! Resolves, merges and persists the per-instance overrides of nested UI
//! component instances, and manages the variants defined on each
//! component's master record.

pub mod config;
pub mod error;
pub mod highlight;
pub mod host;
pub mod locate;
pub mod logging;
pub mod merge;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod tree;

pub use component_store::{ComponentStore, FileStore, MemoryStore, StoreError};
pub use config::{ConfigError, EngineConfig};
pub use error::EngineError;
pub use highlight::{EditingSurface, HighlightReport};
pub use host::{DocumentHost, FileHost, HostError, MockHost};
pub use locate::{locate_frames, Frame, Mode};
pub use merge::{materialize, merge_objects};
pub use override_model::{
    ComponentData, MasterRecord, ModelError, OverrideNode, OverrideRecord, VariantRename,
};
pub use registry::MasterRegistry;
pub use resolve::{override_component, resolve_overrides};
pub use session::{Session, VariantState};
pub use tree::{Document, LoadedDocument, NodeId, NodeKind, TreeError};
