//! Master record registry
//!
//! One master record per component file, shared by every live instance of
//! that file. Instances hold the file key, never a copy of the master.

use std::collections::BTreeMap;

use override_model::{MasterRecord, ModelError};

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    record: MasterRecord,
    digest: String,
}

/// Master records keyed by component file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterRegistry {
    masters: BTreeMap<String, Entry>,
}

impl MasterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded master records
    pub fn from_masters(masters: BTreeMap<String, MasterRecord>) -> Result<Self, ModelError> {
        let mut registry = Self::new();
        for (file, record) in masters {
            registry.commit(&file, record)?;
        }
        Ok(registry)
    }

    /// The master record of `file`
    pub fn get(&self, file: &str) -> Option<&MasterRecord> {
        self.masters.get(file).map(|entry| &entry.record)
    }

    /// A copy of the master record of `file` to stage edits on
    pub fn stage(&self, file: &str) -> MasterRecord {
        self.get(file).cloned().unwrap_or_default()
    }

    /// Content digest of the current master record of `file`
    pub fn digest(&self, file: &str) -> Option<&str> {
        self.masters.get(file).map(|entry| entry.digest.as_str())
    }

    /// Install `record` as the master of `file`.
    ///
    /// Returns true when the content differs from the previous record.
    pub fn commit(&mut self, file: &str, record: MasterRecord) -> Result<bool, ModelError> {
        let digest = record.digest()?;
        let changed = self.digest(file) != Some(digest.as_str());
        self.masters
            .insert(file.to_string(), Entry { record, digest });
        Ok(changed)
    }

    /// Known component files
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.masters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.masters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use override_model::OverrideRecord;

    #[test]
    fn test_commit_reports_changes() {
        let mut registry = MasterRegistry::new();
        let mut master = MasterRecord::default();

        assert!(registry.commit("a.html", master.clone()).unwrap());
        assert!(!registry.commit("a.html", master.clone()).unwrap());

        master.add_variant("size", "large", OverrideRecord::new());
        assert!(registry.commit("a.html", master).unwrap());
        assert!(registry.get("a.html").unwrap().variant("size", "large").is_some());
    }

    #[test]
    fn test_stage_is_detached_copy() {
        let mut registry = MasterRegistry::new();
        registry.commit("a.html", MasterRecord::default()).unwrap();

        let mut staged = registry.stage("a.html");
        staged.add_variant("size", "large", OverrideRecord::new());
        assert!(registry.get("a.html").unwrap().variants.is_empty());
        assert!(registry.stage("unknown.html").variants.is_empty());
    }
}
