//! Component Store
//!
//! Persistence collaborator for master component records:
//! - `save_component_data`: write a master record for a component file
//! - `rename_variant`: out-of-band bookkeeping for variant renames
//! - `load_component_data`: read a master record back on reload
//!
//! `FileStore` persists to disk; `MemoryStore` keeps everything in memory
//! and can inject failures for tests.

mod file;
mod memory;

use std::io;
use std::path::Path;

use override_model::{MasterRecord, VariantRename};

pub use file::{FileStore, RenameLogEntry, DEFAULT_RENAME_LOG};
pub use memory::{MemoryStore, StoreCall};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save failed for {file}: {reason}")]
    SaveFailed { file: String, reason: String },

    #[error("rename failed for {file}: {reason}")]
    RenameFailed { file: String, reason: String },

    #[error("component path {0} escapes the store root")]
    InvalidPath(String),
}

/// Persistence operations the override engine depends on.
///
/// Each call completes before the caller moves on; a returned error aborts
/// the transition that issued it.
pub trait ComponentStore {
    /// Persist the master record of `file`
    fn save_component_data(&mut self, file: &str, master: &MasterRecord) -> Result<(), StoreError>;

    /// Record a variant rename for the component at `relative_file`
    fn rename_variant(&mut self, relative_file: &str, rename: &VariantRename) -> Result<(), StoreError>;

    /// Read the persisted master record of `file`, None if never saved
    fn load_component_data(&self, file: &str) -> Result<Option<MasterRecord>, StoreError>;
}

/// `file` relative to `root` when it lives under it, otherwise unchanged.
///
/// Separators are normalized to `/` so the result is stable across hosts.
pub fn relative_path(root: &Path, file: &str) -> String {
    match Path::new(file).strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_strips_root() {
        let root = Path::new("/projects/site");
        assert_eq!(
            relative_path(root, "/projects/site/component/button.html"),
            "component/button.html"
        );
    }

    #[test]
    fn test_relative_path_outside_root_unchanged() {
        let root = Path::new("/projects/site");
        assert_eq!(relative_path(root, "component/card.html"), "component/card.html");
    }
}
