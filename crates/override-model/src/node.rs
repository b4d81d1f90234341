//! Ref-indexed override storage.
//!
//! An override record maps a reference (element style ref or nested
//! instance ref) to an `OverrideNode`. Each node carries free-form field
//! edits plus its own `children` record, so overrides for a descendant at
//! any nesting depth live under the chain of refs leading to it:
//!
//! ```text
//! { "e0card": { "children": { "e0title": { "inner": "Hello" } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Overrides keyed by reference.
pub type OverrideRecord = BTreeMap<String, OverrideNode>;

/// Overrides stored for a single reference.
///
/// Serialized flat: the `children` key sits next to the field edits and is
/// omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideNode {
    /// Nested overrides for descendants, keyed by their ref
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: OverrideRecord,

    /// Field edits (`attributes`, `properties`, `classes`, `inner`, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OverrideNode {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from a JSON object
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert back to its flat JSON shape
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// True when the node carries no fields and no children
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }

    /// Number of keys the node has in its flat JSON shape
    pub fn key_count(&self) -> usize {
        self.fields.len() + usize::from(!self.children.is_empty())
    }

    /// Field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// A category field as an object, if present
    pub fn category(&self, key: &str) -> Option<&Map<String, Value>> {
        self.fields.get(key).and_then(Value::as_object)
    }

    /// The child record under `reference`, creating the child node if needed.
    ///
    /// This is the step used when descending one component boundary in
    /// writable storage.
    pub fn child_mut(&mut self, reference: &str) -> &mut OverrideNode {
        self.children.entry(reference.to_string()).or_default()
    }
}

/// Descend one level: `record[reference].children`, creating both as needed.
pub fn children_mut<'a>(record: &'a mut OverrideRecord, reference: &str) -> &'a mut OverrideRecord {
    &mut record.entry(reference.to_string()).or_default().children
}
