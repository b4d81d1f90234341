//! Master component definitions.
//!
//! A master record is shared by every instance whose `file` matches. Its
//! `variants` table maps a variant name to the override record stored for
//! each of its values:
//!
//! ```text
//! variants.size.large = { "e0label": { "attributes": { ... } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::ModelError;
use crate::node::OverrideRecord;

/// Variant value -> stored overrides, per variant name
pub type VariantMap = BTreeMap<String, BTreeMap<String, OverrideRecord>>;

/// The shared definition of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    /// Named variants
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: VariantMap,

    /// Keys this engine does not interpret, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A variant rename request. Either half may be unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRename {
    pub name: String,
    pub old_name: String,
    pub value: String,
    pub old_value: String,
}

impl VariantRename {
    /// The rename that undoes this one
    pub fn reversed(&self) -> Self {
        Self {
            name: self.old_name.clone(),
            old_name: self.name.clone(),
            value: self.old_value.clone(),
            old_value: self.value.clone(),
        }
    }

    /// True when neither the name nor the value changes
    pub fn is_noop(&self) -> bool {
        self.name == self.old_name && self.value == self.old_value
    }
}

impl MasterRecord {
    /// Stored overrides for `name=value`, if defined
    pub fn variant(&self, name: &str, value: &str) -> Option<&OverrideRecord> {
        self.variants.get(name).and_then(|values| values.get(value))
    }

    /// Define (or redefine) `name=value`
    pub fn add_variant(&mut self, name: &str, value: &str, overrides: OverrideRecord) {
        self.variants
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string(), overrides);
    }

    /// Remove `name=value`, returning its overrides.
    ///
    /// A variant name left without values is removed as well. Instances
    /// still selecting the removed value are not touched.
    pub fn remove_variant(&mut self, name: &str, value: &str) -> Result<OverrideRecord, ModelError> {
        let values = self
            .variants
            .get_mut(name)
            .ok_or_else(|| not_found(name, value))?;
        let removed = values.remove(value).ok_or_else(|| not_found(name, value))?;
        if values.is_empty() {
            self.variants.remove(name);
        }
        Ok(removed)
    }

    /// Relocate the variant subtree(s) named by `rename`.
    ///
    /// The name is moved first, then the value within the (new) name. An
    /// existing entry at the destination is replaced. Nothing is modified
    /// when the source does not exist.
    pub fn rename_variant(&mut self, rename: &VariantRename) -> Result<(), ModelError> {
        let values = self
            .variants
            .get(&rename.old_name)
            .ok_or_else(|| ModelError::VariantNameNotFound(rename.old_name.clone()))?;
        if rename.value != rename.old_value && !values.contains_key(&rename.old_value) {
            return Err(not_found(&rename.old_name, &rename.old_value));
        }

        if rename.name != rename.old_name {
            if let Some(values) = self.variants.remove(&rename.old_name) {
                self.variants.insert(rename.name.clone(), values);
            }
        }
        if rename.value != rename.old_value {
            if let Some(values) = self.variants.get_mut(&rename.name) {
                if let Some(overrides) = values.remove(&rename.old_value) {
                    values.insert(rename.value.clone(), overrides);
                }
            }
        }
        Ok(())
    }

    /// SHA-256 hex digest of JCS(record)
    pub fn digest(&self) -> Result<String, ModelError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(self)
            .map_err(|e| ModelError::JcsError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn not_found(name: &str, value: &str) -> ModelError {
    ModelError::VariantNotFound {
        name: name.to_string(),
        value: value.to_string(),
    }
}
