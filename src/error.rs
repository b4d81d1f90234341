//! Engine error types.

use component_store::StoreError;
use override_model::ModelError;

use crate::host::HostError;
use crate::tree::{NodeId, TreeError};

/// Errors from mutating engine operations.
///
/// Lookups never fail: a node without component association resolves to
/// `None`, and selections of deleted variants are skipped.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Node {0:?} is not a component instance")]
    NotAComponent(NodeId),
}
