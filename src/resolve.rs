//! Override store resolution
//!
//! Given a frame chain, walks override storage from the outermost frame
//! down, descending `record[ref].children` once per nested frame, and
//! returns the node stored under the addressed ref.
//!
//! Two flavors:
//! - original: the mutable raw storage of the outermost frame's copy of its
//!   data. Missing containers are created on the way down so the caller can
//!   assign straight into the result.
//! - full: a read-only materialized view. Each frame contributes its own
//!   variants and overrides; what an enclosing frame stored for it is merged
//!   on top.

use std::collections::BTreeMap;

use override_model::node::children_mut;
use override_model::{category, ComponentData, OverrideNode, OverrideRecord};
use serde_json::Value;
use tracing::debug;

use crate::locate::{locate_frames, Frame, Mode};
use crate::merge::{materialize, materialize_selection, merge_objects};
use crate::registry::MasterRegistry;
use crate::tree::{Document, NodeId, TreeError};

/// The key a node's overrides are stored under.
///
/// Elements use their style ref, instances their instance ref.
pub fn override_ref(document: &Document, node: NodeId, mode: Mode) -> Option<String> {
    match mode {
        Mode::Element => document.node(node).map(|found| found.style_ref.clone()),
        Mode::Component => document
            .component_data(node)
            .map(|data| data.instance_ref.clone()),
    }
}

/// Materialized overrides for `node`, or None when it has no frames.
pub fn resolve_overrides(
    document: &Document,
    registry: &MasterRegistry,
    node: NodeId,
    mode: Mode,
) -> Option<OverrideNode> {
    let frames = locate_frames(document, node, mode)?;
    let reference = override_ref(document, node, mode)?;
    Some(full_overrides(&frames, &reference, registry))
}

/// Read-only materialized overrides stored for `reference` below `frames`.
///
/// A top-level frame has no parent ref to nest under: the result is empty
/// when nothing is materialized, otherwise the whole record as `children`.
pub fn full_overrides(frames: &[Frame], reference: &str, registry: &MasterRegistry) -> OverrideNode {
    let Some((first, rest)) = frames.split_first() else {
        return OverrideNode::new();
    };

    let mut record = materialize(&first.data, registry.get(&first.data.file));
    for frame in rest {
        let inherited = record.remove(&frame.data.instance_ref).unwrap_or_default();
        record = nested_overrides(&frame.data, registry, inherited);
    }

    if first.top_level {
        return OverrideNode {
            children: record,
            ..Default::default()
        };
    }
    record.remove(reference).unwrap_or_default()
}

/// A nested instance's own materialized overrides with what its enclosing
/// component stored for it merged on top.
///
/// A `variants` selection stored by the enclosing component replaces the
/// instance's own selection per variant name.
fn nested_overrides(data: &ComponentData, registry: &MasterRegistry, inherited: OverrideNode) -> OverrideRecord {
    let mut selection = data.variants.clone();
    if let Some(chosen) = inherited.category(category::VARIANTS) {
        apply_selection(&mut selection, chosen);
    }

    let mut record = materialize_selection(data, registry.get(&data.file), &selection);
    merge_objects(&mut record, &inherited.children);
    record
}

fn apply_selection(selection: &mut BTreeMap<String, String>, chosen: &serde_json::Map<String, Value>) {
    for (name, value) in chosen {
        match value.as_str() {
            Some(value) if !value.is_empty() => {
                selection.insert(name.clone(), value.to_string());
            }
            _ => {
                selection.remove(name);
            }
        }
    }
}

/// Writable raw storage for `reference` below `frames`.
///
/// Creates `overrides`, and each `[ref].children` container on the way
/// down, in the outermost frame's copy of its data. Write that data back to
/// the tree once done. Returns None for a top-level frame, which has no
/// ref-indexed slot.
pub fn original_overrides<'a>(frames: &'a mut [Frame], reference: &str) -> Option<&'a mut OverrideNode> {
    let (first, rest) = frames.split_first_mut()?;
    if first.top_level {
        return None;
    }

    let mut record = first.data.overrides_mut();
    for frame in rest.iter() {
        record = children_mut(record, &frame.data.instance_ref);
    }
    Some(record.entry(reference.to_string()).or_default())
}

/// Store `key = value` as an override of the nested instance `node` inside
/// its enclosing components, and write the outermost component back.
///
/// Returns the frames so the caller can recompose the outermost one, or
/// None when `node` is not a nested instance.
pub fn override_component(
    document: &mut Document,
    node: NodeId,
    key: &str,
    value: Value,
) -> Result<Option<Vec<Frame>>, TreeError> {
    let Some(mut frames) = locate_frames(document, node, Mode::Component) else {
        return Ok(None);
    };
    let Some(reference) = override_ref(document, node, Mode::Component) else {
        return Ok(None);
    };
    let Some(slot) = original_overrides(&mut frames, &reference) else {
        return Ok(None);
    };
    slot.set(key, value);

    let outer = &frames[0];
    document.set_component_data(outer.node, outer.data.clone())?;
    debug!(
        instance = %reference,
        outer = %outer.data.instance_ref,
        key,
        "stored nested instance override"
    );
    Ok(Some(frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use override_model::MasterRecord;
    use serde_json::json;

    fn data(value: Value) -> ComponentData {
        serde_json::from_value(value).unwrap()
    }

    /// page(top-level) > card(nested) > title
    fn nested_doc(page_overrides: Value) -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let page = doc.add_node(
            None,
            "page",
            NodeKind::Root(data(json!({
                "ref": "page", "file": "page.html", "overrides": page_overrides
            }))),
            false,
        );
        let card = doc.add_node(
            Some(page),
            "card",
            NodeKind::Root(data(json!({"ref": "card", "file": "card.html"}))),
            true,
        );
        let title = doc.add_node(Some(card), "e0title", NodeKind::Element, true);
        (doc, page, card, title)
    }

    #[test]
    fn test_full_nested_lookup() {
        let (doc, _, _, title) = nested_doc(json!({
            "card": {"children": {"e0title": {"inner": "Hi"}}}
        }));
        let registry = MasterRegistry::new();

        let node = resolve_overrides(&doc, &registry, title, Mode::Element).unwrap();
        assert_eq!(node.get("inner"), Some(&json!("Hi")));
    }

    #[test]
    fn test_full_does_not_mutate_tree() {
        let (doc, page, _, title) = nested_doc(json!({}));
        let before = doc.component_data(page).cloned();
        let registry = MasterRegistry::new();

        let node = resolve_overrides(&doc, &registry, title, Mode::Element).unwrap();
        assert!(node.is_empty());
        assert_eq!(doc.component_data(page).cloned(), before);
    }

    #[test]
    fn test_full_nested_variant_selected_by_parent() {
        let (doc, _, _, title) = nested_doc(json!({
            "card": {"variants": {"tone": "dark"}}
        }));
        let mut master = MasterRecord::default();
        master.add_variant(
            "tone",
            "dark",
            serde_json::from_value(json!({"e0title": {"classes": {"dark": {"add": true}}}})).unwrap(),
        );
        let mut registry = MasterRegistry::new();
        registry.commit("card.html", master).unwrap();

        let node = resolve_overrides(&doc, &registry, title, Mode::Element).unwrap();
        assert_eq!(node.category("classes").unwrap()["dark"], json!({"add": true}));
    }

    #[test]
    fn test_parent_override_wins_over_nested_instance() {
        let (mut doc, _, card, title) = nested_doc(json!({
            "card": {"children": {"e0title": {"inner": "outer"}}}
        }));
        let mut card_data = doc.component_data(card).unwrap().clone();
        card_data.overrides = Some(serde_json::from_value(json!({"e0title": {"inner": "own"}})).unwrap());
        doc.set_component_data(card, card_data).unwrap();

        let node = resolve_overrides(&doc, &MasterRegistry::new(), title, Mode::Element).unwrap();
        assert_eq!(node.get("inner"), Some(&json!("outer")));
    }

    #[test]
    fn test_original_creates_containers() {
        let (doc, _, _, title) = nested_doc(json!(null));
        let mut frames = locate_frames(&doc, title, Mode::Element).unwrap();
        assert_eq!(frames.len(), 2);

        let slot = original_overrides(&mut frames, "e0title").unwrap();
        slot.set("inner", json!("new"));

        let stored = serde_json::to_value(frames[0].data.overrides.as_ref().unwrap()).unwrap();
        assert_eq!(stored, json!({"card": {"children": {"e0title": {"inner": "new"}}}}));
    }

    #[test]
    fn test_original_top_level_has_no_slot() {
        let mut doc = Document::new();
        let card = doc.place_component(None, "card.html", false);
        let mut frames = locate_frames(&doc, card, Mode::Component).unwrap();
        assert!(original_overrides(&mut frames, "anything").is_none());
    }

    #[test]
    fn test_top_level_wrap() {
        let mut doc = Document::new();
        let card = doc.add_node(
            None,
            "card",
            NodeKind::Root(data(json!({"ref": "card", "file": "card.html"}))),
            false,
        );
        let registry = MasterRegistry::new();
        let empty = resolve_overrides(&doc, &registry, card, Mode::Component).unwrap();
        assert!(empty.is_empty());

        let mut filled = doc.component_data(card).unwrap().clone();
        filled.overrides = Some(serde_json::from_value(json!({"e0a": {"inner": "x"}})).unwrap());
        doc.set_component_data(card, filled).unwrap();

        let node = resolve_overrides(&doc, &registry, card, Mode::Component).unwrap();
        assert_eq!(node.to_value(), json!({"children": {"e0a": {"inner": "x"}}}));
    }

    #[test]
    fn test_override_component_writes_back() {
        let (mut doc, page, card, _) = nested_doc(json!(null));

        let frames = override_component(&mut doc, card, "variants", json!({"tone": "dark"}))
            .unwrap()
            .unwrap();
        assert_eq!(frames[0].node, page);

        let stored = doc.component_data(page).unwrap().overrides.clone().unwrap();
        assert_eq!(stored["card"].get("variants"), Some(&json!({"tone": "dark"})));
    }

    #[test]
    fn test_override_component_top_level_is_none() {
        let mut doc = Document::new();
        let card = doc.place_component(None, "card.html", false);
        assert!(override_component(&mut doc, card, "variants", json!({})).unwrap().is_none());
    }
}
