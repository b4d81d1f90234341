//! Filesystem-backed component store.
//!
//! Layout under the store root:
//! - `<relative component path>.json` - one master record per component
//! - `<rename log>` - JSON lines, one entry per variant rename
//!
//! Master records are written to a temp file and renamed into place so a
//! reload never observes a partially written record. Nothing is created on
//! disk until the first write.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use override_model::{MasterRecord, VariantRename};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{relative_path, ComponentStore, StoreError};

/// Default rename log file name
pub const DEFAULT_RENAME_LOG: &str = "variant-renames.jsonl";

/// One line of the rename log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameLogEntry {
    /// When the rename was recorded
    pub at: DateTime<Utc>,

    /// Component path relative to the project root
    pub file: String,

    /// The rename itself
    #[serde(flatten)]
    pub rename: VariantRename,
}

/// Component store rooted in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Project root; component paths under it are stored relative to it
    project_root: PathBuf,
    /// Directory holding master records
    store_root: PathBuf,
    /// Rename log path
    rename_log: PathBuf,
}

impl FileStore {
    /// Create a store writing into `store_root`.
    ///
    /// A relative `rename_log` is placed under `store_root`.
    pub fn new(
        project_root: impl AsRef<Path>,
        store_root: impl AsRef<Path>,
        rename_log: impl AsRef<Path>,
    ) -> Self {
        let store_root = store_root.as_ref().to_path_buf();

        let rename_log = rename_log.as_ref();
        let rename_log = if rename_log.is_absolute() {
            rename_log.to_path_buf()
        } else {
            store_root.join(rename_log)
        };

        Self {
            project_root: project_root.as_ref().to_path_buf(),
            store_root,
            rename_log,
        }
    }

    /// Path of the persisted master record for `file`.
    ///
    /// Always under the store root: root and `.` parts are dropped, `..`
    /// parts are rejected.
    pub fn master_path(&self, file: &str) -> Result<PathBuf, StoreError> {
        let relative = relative_path(&self.project_root, file);
        let mut path = PathBuf::new();
        for component in Path::new(&relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => return Err(StoreError::InvalidPath(file.to_string())),
            }
        }
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidPath(file.to_string()));
        }

        let mut name = path.into_os_string();
        name.push(".json");
        Ok(self.store_root.join(name))
    }

    /// Path of the rename log
    pub fn rename_log_path(&self) -> &Path {
        &self.rename_log
    }

    /// All entries recorded in the rename log, oldest first
    pub fn rename_history(&self) -> Result<Vec<RenameLogEntry>, StoreError> {
        if !self.rename_log.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.rename_log)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StoreError::from))
            .collect()
    }
}

impl ComponentStore for FileStore {
    fn save_component_data(&mut self, file: &str, master: &MasterRecord) -> Result<(), StoreError> {
        let path = self.master_path(file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = master.to_json()?;
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, json)?;
        fs::rename(&temp, &path)?;

        debug!(file, path = %path.display(), "saved master record");
        Ok(())
    }

    fn rename_variant(&mut self, relative_file: &str, rename: &VariantRename) -> Result<(), StoreError> {
        let entry = RenameLogEntry {
            at: Utc::now(),
            file: relative_file.to_string(),
            rename: rename.clone(),
        };
        let line = serde_json::to_string(&entry)?;

        if let Some(parent) = self.rename_log.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.rename_log)?;
        writeln!(log, "{}", line)?;

        debug!(file = relative_file, name = %rename.name, value = %rename.value, "recorded variant rename");
        Ok(())
    }

    fn load_component_data(&self, file: &str) -> Result<Option<MasterRecord>, StoreError> {
        let path = self.master_path(file)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(MasterRecord::from_json(&json)?))
    }
}
