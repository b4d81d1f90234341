//! Variant lifecycle
//!
//! A variant value of a component moves between three states:
//! ABSENT → DEFINED (save) → SELECTED (switch on an instance)
//! and back through delete. Renames relocate a defined variant.
//!
//! Every transition stages the master on a copy, saves it, and only then
//! installs it. The registry holds one copy per master, so installing it is
//! what every instance sharing the file observes.
//!
//! Transitions that end with a full reload rebuild the document arena. They
//! return the reselected node; ids held from before the reload must not be
//! reused.

use component_store::{relative_path, ComponentStore};
use override_model::{category, ComponentData, MasterRecord, OverrideRecord, VariantRename};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::host::DocumentHost;
use crate::tree::NodeId;

use super::Session;

/// State of one variant value relative to one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantState {
    /// Not defined on the master (a selection of it is stale)
    Absent,
    /// Defined on the master, not selected by the instance
    Defined,
    /// Defined and selected by the instance
    Selected,
}

impl VariantState {
    /// State of `name=value` for the instance `data`
    pub fn of(master: Option<&MasterRecord>, data: &ComponentData, name: &str, value: &str) -> Self {
        let defined = master.is_some_and(|master| master.variant(name, value).is_some());
        let selected = data.variants.get(name).is_some_and(|chosen| chosen == value);
        match (defined, selected) {
            (false, _) => VariantState::Absent,
            (true, false) => VariantState::Defined,
            (true, true) => VariantState::Selected,
        }
    }
}

impl<S: ComponentStore, H: DocumentHost> Session<S, H> {
    /// State of `name=value` for the instance at `node`
    pub fn variant_state(&self, node: NodeId, name: &str, value: &str) -> Option<VariantState> {
        let data = self.document.component_data(node)?;
        Some(VariantState::of(self.registry.get(&data.file), data, name, value))
    }

    /// Define `name=value` on the master of the instance at `node`.
    ///
    /// A fresh definition (usually built from the instance's overrides)
    /// replaces those overrides with a selection of the new variant, and
    /// every instance sharing the master sees it. An undo replay restores a
    /// deleted variant, then reloads and reselects the instance.
    ///
    /// Returns the instance's node afterwards, None when a reload dropped it.
    pub fn save_variant(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
        overrides: OverrideRecord,
        undo: bool,
    ) -> Result<Option<NodeId>, EngineError> {
        let mut data = self.component(node)?;
        let mut staged = self.registry.stage(&data.file);
        staged.add_variant(name, value, overrides);
        self.persist_master(&data.file, staged)?;
        info!(file = %data.file, name, value, undo, "saved variant");

        if undo {
            return self.reload_and_select(&data.instance_ref);
        }

        data.overrides = None;
        data.select_variant(name, Some(value));
        self.document.set_component_data(node, data)?;
        Ok(Some(node))
    }

    /// Remove `name=value` from the master of the instance at `node`.
    ///
    /// Returns a copy of the removed overrides and the instance's node
    /// afterwards. An undo replay (of a create) puts the overrides back as the
    /// instance's own. A user delete reloads and reselects, since other
    /// instances may still select the removed value; those selections are
    /// left in place and skipped when merging.
    pub fn delete_variant(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
        undo: bool,
    ) -> Result<(OverrideRecord, Option<NodeId>), EngineError> {
        let mut data = self.component(node)?;
        let mut staged = self.registry.stage(&data.file);
        let removed = staged.remove_variant(name, value)?;
        self.persist_master(&data.file, staged)?;
        info!(file = %data.file, name, value, undo, "deleted variant");

        if !undo {
            let reselected = self.reload_and_select(&data.instance_ref)?;
            return Ok((removed, reselected));
        }

        data.overrides = Some(removed.clone());
        data.variants.remove(name);
        self.document.set_component_data(node, data)?;
        Ok((removed, Some(node)))
    }

    /// Select `value` (or clear with None) for variant `name` on the
    /// instance at `node`, then have the host recompose.
    ///
    /// A nested instance's selection is stored as an override inside its
    /// enclosing components, and the outermost one is recomposed.
    pub fn switch_variant(
        &mut self,
        node: NodeId,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), EngineError> {
        let mut data = self.component(node)?;
        data.select_variant(name, value);
        let instance_ref = data.instance_ref.clone();

        if self.document.is_component_element(node) {
            let selection = selection_value(&data, name);
            if let Some(frames) = self.override_component(node, category::VARIANTS, selection)? {
                self.document.set_component_data(node, data)?;
                let outer = frames[0].node;
                self.host
                    .recompose(&self.document, outer, Some(&instance_ref))?;
                debug!(instance = %instance_ref, name, ?value, "switched nested variant");
                return Ok(());
            }
        }

        self.document.set_component_data(node, data)?;
        self.host.recompose(&self.document, node, None)?;
        debug!(instance = %instance_ref, name, ?value, "switched variant");
        Ok(())
    }

    /// Rename a variant name and/or value on the master of the instance at
    /// `node`, record the rename, then reload and reselect `reference`.
    ///
    /// Returns the node `reference` resolves to in the reloaded document.
    pub fn rename_variant(
        &mut self,
        node: NodeId,
        reference: &str,
        rename: &VariantRename,
    ) -> Result<Option<NodeId>, EngineError> {
        let data = self.component(node)?;
        let mut staged = self.registry.stage(&data.file);
        staged.rename_variant(rename)?;
        self.persist_master(&data.file, staged)?;

        let relative = relative_path(&self.project_root, &data.file);
        self.store.rename_variant(&relative, rename)?;
        info!(
            file = %relative,
            name = %rename.name,
            old_name = %rename.old_name,
            value = %rename.value,
            old_value = %rename.old_value,
            "renamed variant"
        );

        self.reload_and_select(reference)
    }
}

/// The instance's selection as stored in an enclosing override.
///
/// A cleared name is kept with an empty value so it masks the instance's
/// own selection.
fn selection_value(data: &ComponentData, name: &str) -> Value {
    let mut selection: Map<String, Value> = data
        .variants
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    selection
        .entry(name.to_string())
        .or_insert_with(|| Value::String(String::new()));
    Value::Object(selection)
}
