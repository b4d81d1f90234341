//! Per-instance component data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::master::MasterRecord;
use crate::node::OverrideRecord;

/// The data record carried by a component instance root.
///
/// `ref` is stable for the lifetime of the instance and is the key under
/// which enclosing components store this instance's overrides. The master
/// definition is shared through `file`; an embedded `main` is only accepted
/// on the wire and is moved into the master registry when a document loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    /// Unique instance reference
    #[serde(rename = "ref")]
    pub instance_ref: String,

    /// Path to the component definition
    pub file: String,

    /// Selected variant value per variant name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, String>,

    /// Raw ad-hoc overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<OverrideRecord>,

    /// Precomputed overrides; preferred over `overrides` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_overrides: Option<OverrideRecord>,

    /// Embedded master definition (wire only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MasterRecord>,
}

impl ComponentData {
    /// Create the record for a freshly placed instance of `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            instance_ref: generate_ref(),
            file: file.into(),
            ..Default::default()
        }
    }

    /// Select `value` for variant `name`, or clear the selection with `None`
    pub fn select_variant(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) if !value.is_empty() => {
                self.variants.insert(name.to_string(), value.to_string());
            }
            _ => {
                self.variants.remove(name);
            }
        }
    }

    /// The raw override record, created empty if missing
    pub fn overrides_mut(&mut self) -> &mut OverrideRecord {
        self.overrides.get_or_insert_with(OverrideRecord::new)
    }
}

/// Instance refs share the `e0` prefix used by element style refs.
fn generate_ref() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("e0{}", &id[..10])
}
