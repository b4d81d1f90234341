//! Override highlighting
//!
//! Given the materialized overrides of a node and the fields an editing
//! surface currently displays, reports which fields show overridden values
//! and which warning slots must be shown for deleted records.

use override_model::{category, OverrideNode, MARKER_DELETE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Class the editor puts on overridden fields unless configured otherwise
pub const DEFAULT_OVERRIDE_CLASS: &str = "override";

/// Kind of a displayed field, which decides the category it matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Fixed attribute field of the element form
    Attribute,
    /// Free-form attribute added by the user
    CustomAttribute,
    /// Component property block
    Property,
    /// Class selector
    Class,
    /// Field bound to a whole top-level key such as `inner` or `tag`
    Toggle,
}

/// A field on the editing surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceField {
    pub kind: FieldKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Text,
    Attributes,
    Properties,
    Classes,
}

/// A warning affordance on the editing surface, hidden until reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningSlot {
    pub kind: WarningKind,
    #[serde(default)]
    pub tooltip: String,
}

/// Everything the reporter needs to know about what is displayed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingSurface {
    #[serde(default)]
    pub fields: Vec<SurfaceField>,
    #[serde(default)]
    pub warnings: Vec<WarningSlot>,
    #[serde(default)]
    pub element_type: Option<String>,
}

/// A warning slot to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShownWarning {
    /// Index into `EditingSurface::warnings`
    pub slot: usize,
    pub kind: WarningKind,
    /// Deleted record names (empty for the text warning)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<String>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    /// Class to put on overridden fields
    pub class: String,
    /// Indexes into `EditingSurface::fields`
    pub overridden: Vec<usize>,
    pub warnings: Vec<ShownWarning>,
}

impl HighlightReport {
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }
}

/// Highlight `surface` against materialized `overrides`
pub fn report(overrides: &OverrideNode, surface: &EditingSurface) -> HighlightReport {
    let overridden = surface
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| is_overridden(overrides, field))
        .map(|(index, _)| index)
        .collect();

    let deleted_attributes = deleted_attributes(overrides, surface);
    let deleted_properties = deleted_records(overrides.category(category::PROPERTIES));
    let deleted_classes = deleted_records(overrides.category(category::CLASSES));
    let text_overridden = surface.element_type.as_deref() == Some("text")
        && overrides.get(category::INNER).is_some_and(is_truthy);

    let mut warnings = Vec::new();
    for (slot, warning) in surface.warnings.iter().enumerate() {
        let records = match warning.kind {
            WarningKind::Text => {
                if text_overridden {
                    warnings.push(ShownWarning {
                        slot,
                        kind: warning.kind,
                        records: Vec::new(),
                        tooltip: warning.tooltip.clone(),
                    });
                }
                continue;
            }
            WarningKind::Attributes => &deleted_attributes,
            WarningKind::Properties => &deleted_properties,
            WarningKind::Classes => &deleted_classes,
        };
        if records.is_empty() {
            continue;
        }
        warnings.push(ShownWarning {
            slot,
            kind: warning.kind,
            records: records.clone(),
            tooltip: tooltip_with_records(&warning.tooltip, records),
        });
    }

    HighlightReport {
        class: DEFAULT_OVERRIDE_CLASS.to_string(),
        overridden,
        warnings,
    }
}

fn is_overridden(overrides: &OverrideNode, field: &SurfaceField) -> bool {
    let name = field.name.as_str();
    match field.kind {
        FieldKind::Attribute | FieldKind::CustomAttribute => overrides
            .category(category::ATTRIBUTES)
            .is_some_and(|attributes| attributes.contains_key(name)),
        FieldKind::Property => overrides
            .category(category::PROPERTIES)
            .is_some_and(|properties| properties.contains_key(name)),
        FieldKind::Class => overrides
            .category(category::CLASSES)
            .and_then(|classes| classes.get(name))
            .is_some_and(is_truthy),
        FieldKind::Toggle => overrides.get(name).is_some_and(is_truthy),
    }
}

/// Names of records marked deleted in a category
fn deleted_records(records: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(records) = records else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|(_, record)| record.get(MARKER_DELETE).is_some_and(is_truthy))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Deleted attributes, leaving out those the fixed attribute fields show
fn deleted_attributes(overrides: &OverrideNode, surface: &EditingSurface) -> Vec<String> {
    let regular: Vec<&str> = surface
        .fields
        .iter()
        .filter(|field| field.kind == FieldKind::Attribute)
        .map(|field| field.name.as_str())
        .collect();
    deleted_records(overrides.category(category::ATTRIBUTES))
        .into_iter()
        .filter(|name| !regular.contains(&name.as_str()))
        .collect()
}

fn tooltip_with_records(tooltip: &str, records: &[String]) -> String {
    let names = records.join(", ");
    if tooltip.is_empty() {
        names
    } else {
        format!("{tooltip} {names}")
    }
}

/// Loose truthiness of stored override values
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(kind: FieldKind, name: &str) -> SurfaceField {
        SurfaceField {
            kind,
            name: name.to_string(),
        }
    }

    fn slot(kind: WarningKind, tooltip: &str) -> WarningSlot {
        WarningSlot {
            kind,
            tooltip: tooltip.to_string(),
        }
    }

    fn node(value: Value) -> OverrideNode {
        OverrideNode::from_value(value).unwrap()
    }

    #[test]
    fn test_fields_match_their_own_category() {
        let overrides = node(json!({
            "attributes": {"href": {"value": "/a"}},
            "properties": {"label": {"value": "Go"}},
            "classes": {"primary": {"add": true}, "muted": null}
        }));
        let surface = EditingSurface {
            fields: vec![
                field(FieldKind::Attribute, "href"),
                field(FieldKind::Property, "href"),
                field(FieldKind::Property, "label"),
                field(FieldKind::Class, "primary"),
                field(FieldKind::Class, "muted"),
                field(FieldKind::CustomAttribute, "label"),
            ],
            ..Default::default()
        };

        let report = report(&overrides, &surface);
        assert_eq!(report.overridden, vec![0, 2, 3]);
        assert_eq!(report.class, "override");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_toggle_needs_truthy_value() {
        let surface = EditingSurface {
            fields: vec![field(FieldKind::Toggle, "inner"), field(FieldKind::Toggle, "tag")],
            ..Default::default()
        };
        let report = report(&node(json!({"inner": "<b>x</b>", "tag": ""})), &surface);
        assert_eq!(report.overridden, vec![0]);
    }

    #[test]
    fn test_deleted_custom_attributes_warn() {
        let overrides = node(json!({
            "attributes": {
                "title": {"delete": true},
                "data-x": {"delete": true},
                "alt": {"value": "a"}
            }
        }));
        let surface = EditingSurface {
            fields: vec![field(FieldKind::Attribute, "title")],
            warnings: vec![
                slot(WarningKind::Attributes, "Deleted attributes:"),
                slot(WarningKind::Properties, "Deleted properties:"),
            ],
            element_type: None,
        };

        let report = report(&overrides, &surface);
        assert_eq!(report.warnings.len(), 1);
        let shown = &report.warnings[0];
        assert_eq!(shown.slot, 0);
        assert_eq!(shown.records, vec!["data-x"]);
        assert_eq!(shown.tooltip, "Deleted attributes: data-x");
    }

    #[test]
    fn test_only_regular_deleted_attributes_show_nothing() {
        let overrides = node(json!({"attributes": {"title": {"delete": true}}}));
        let surface = EditingSurface {
            fields: vec![field(FieldKind::Attribute, "title")],
            warnings: vec![slot(WarningKind::Attributes, "Deleted:")],
            element_type: None,
        };
        assert!(report(&overrides, &surface).warnings.is_empty());
    }

    #[test]
    fn test_deleted_classes_and_properties() {
        let overrides = node(json!({
            "properties": {"size": {"delete": true}, "tone": {"delete": true}},
            "classes": {"old": {"delete": true}, "new": {"add": true}}
        }));
        let surface = EditingSurface {
            warnings: vec![slot(WarningKind::Classes, ""), slot(WarningKind::Properties, "Gone:")],
            ..Default::default()
        };

        let report = report(&overrides, &surface);
        assert_eq!(report.warnings[0].tooltip, "old");
        assert_eq!(report.warnings[1].tooltip, "Gone: size, tone");
    }

    #[test]
    fn test_text_warning_only_for_text_elements() {
        let overrides = node(json!({"inner": "changed"}));
        let mut surface = EditingSurface {
            warnings: vec![slot(WarningKind::Text, "Text is overridden")],
            element_type: Some("block".to_string()),
            ..Default::default()
        };
        assert!(report(&overrides, &surface).warnings.is_empty());

        surface.element_type = Some("text".to_string());
        let report = report(&overrides, &surface);
        assert_eq!(report.warnings[0].kind, WarningKind::Text);
        assert_eq!(report.warnings[0].tooltip, "Text is overridden");
    }

    #[test]
    fn test_with_class() {
        let report = report(&OverrideNode::new(), &EditingSurface::default()).with_class("ovr");
        assert_eq!(report.class, "ovr");
    }
}
