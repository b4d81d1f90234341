//! Deep merge and conflict repair
//!
//! Merge semantics (last writer wins):
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)
//!
//! After every merge, a leaf left holding both a positive marker and a
//! delete marker (`{value, delete}` or `{add, delete}`) keeps only `delete`.

use std::collections::BTreeMap;

use override_model::{
    ComponentData, MasterRecord, OverrideNode, OverrideRecord, MARKER_ADD, MARKER_DELETE,
    MARKER_VALUE,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            merge_maps(&mut base_map, overlay_map);
            Value::Object(base_map)
        }

        // Scalars, arrays and mixed shapes: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
}

/// Merge `overlay` into `base` node: fields deep-merge, children by ref
pub fn merge_node(base: &mut OverrideNode, overlay: &OverrideNode) {
    merge_maps(&mut base.fields, overlay.fields.clone());
    merge_record(&mut base.children, &overlay.children);
}

/// Merge `overlay` into `base`, ref by ref
pub fn merge_record(base: &mut OverrideRecord, overlay: &OverrideRecord) {
    for (reference, node) in overlay {
        merge_node(base.entry(reference.clone()).or_default(), node);
    }
}

/// Merge then repair conflicting marker pairs. `base` is mutated.
pub fn merge_objects(base: &mut OverrideRecord, overlay: &OverrideRecord) {
    merge_record(base, overlay);
    fix_record(base);
}

/// Repair conflicting marker pairs at every level of a record
pub fn fix_record(record: &mut OverrideRecord) {
    for node in record.values_mut() {
        fix_node(node);
    }
}

/// Repair conflicting marker pairs at every level of a node
pub fn fix_node(node: &mut OverrideNode) {
    if node.key_count() == 2 && node.children.is_empty() {
        fix_pair(&mut node.fields);
    }
    for value in node.fields.values_mut() {
        fix_value(value);
    }
    fix_record(&mut node.children);
}

/// Repair conflicting marker pairs at every level of a JSON value
pub fn fix_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            fix_pair(map);
            for child in map.values_mut() {
                fix_value(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                fix_value(item);
            }
        }
        _ => {}
    }
}

/// Exactly `{value, delete}` or `{add, delete}`: drop the positive marker.
fn fix_pair(map: &mut Map<String, Value>) {
    if map.len() != 2 || !map.contains_key(MARKER_DELETE) {
        return;
    }
    for marker in [MARKER_VALUE, MARKER_ADD] {
        if map.remove(marker).is_some() {
            return;
        }
    }
}

/// Materialize the effective overrides of an instance.
///
/// Active variants are merged first, in selection order; selections with no
/// definition in the master are skipped. `fullOverrides` (when present) or
/// else `overrides` is merged last. Stored data is never modified.
pub fn materialize(data: &ComponentData, master: Option<&MasterRecord>) -> OverrideRecord {
    materialize_selection(data, master, &data.variants)
}

/// Materialize with an explicit variant selection in place of `data.variants`
pub fn materialize_selection(
    data: &ComponentData,
    master: Option<&MasterRecord>,
    selection: &BTreeMap<String, String>,
) -> OverrideRecord {
    let mut overrides = OverrideRecord::new();
    merge_variants(data, master, selection, &mut overrides);

    if let Some(full) = &data.full_overrides {
        merge_objects(&mut overrides, full);
    } else if let Some(raw) = &data.overrides {
        merge_objects(&mut overrides, raw);
    }
    overrides
}

fn merge_variants(
    data: &ComponentData,
    master: Option<&MasterRecord>,
    selection: &BTreeMap<String, String>,
    overrides: &mut OverrideRecord,
) {
    for (name, value) in selection {
        // deleted variants are not cleaned up from instances (undo keeps them)
        match master.and_then(|master| master.variant(name, value)) {
            Some(variant) => merge_objects(overrides, variant),
            None => debug!(
                instance = %data.instance_ref,
                file = %data.file,
                name = %name,
                value = %value,
                "skipping undefined variant"
            ),
        }
    }
}
