//! In-memory component store with failure injection.

use std::collections::HashMap;

use override_model::{MasterRecord, VariantRename};

use crate::{ComponentStore, StoreError};

/// A call observed by the memory store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Save { file: String },
    Rename { file: String, rename: VariantRename },
}

/// Store keeping master records in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    masters: HashMap<String, MasterRecord>,
    calls: Vec<StoreCall>,
    fail_next_save: bool,
    fail_next_rename: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persisted master record
    pub fn insert(&mut self, file: impl Into<String>, master: MasterRecord) {
        self.masters.insert(file.into(), master);
    }

    /// The persisted master record of `file`
    pub fn get(&self, file: &str) -> Option<&MasterRecord> {
        self.masters.get(file)
    }

    /// Calls observed so far, in order
    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    /// Make the next save fail
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }

    /// Make the next rename fail
    pub fn fail_next_rename(&mut self) {
        self.fail_next_rename = true;
    }
}

impl ComponentStore for MemoryStore {
    fn save_component_data(&mut self, file: &str, master: &MasterRecord) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Save {
            file: file.to_string(),
        });
        if std::mem::take(&mut self.fail_next_save) {
            return Err(StoreError::SaveFailed {
                file: file.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.masters.insert(file.to_string(), master.clone());
        Ok(())
    }

    fn rename_variant(&mut self, relative_file: &str, rename: &VariantRename) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Rename {
            file: relative_file.to_string(),
            rename: rename.clone(),
        });
        if std::mem::take(&mut self.fail_next_rename) {
            return Err(StoreError::RenameFailed {
                file: relative_file.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn load_component_data(&self, file: &str) -> Result<Option<MasterRecord>, StoreError> {
        Ok(self.masters.get(file).cloned())
    }
}
