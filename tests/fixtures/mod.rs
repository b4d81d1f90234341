//! Shared document fixtures for the integration tests.
#![allow(dead_code)]

use component_overrides::{
    Document, LoadedDocument, MemoryStore, MockHost, NodeId, OverrideRecord, Session,
};
use serde_json::{json, Value};

pub const PROJECT: &str = "/project";
pub const BUTTON: &str = "/project/component/button.html";
pub const PAGE: &str = "/project/component/page.html";
pub const LAYOUT: &str = "/project/component/layout.html";

pub type TestSession = Session<MemoryStore, MockHost>;

pub fn record(value: Value) -> OverrideRecord {
    serde_json::from_value(value).unwrap()
}

pub fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

pub fn load(document: Value) -> LoadedDocument {
    Document::from_json(&document.to_string()).unwrap()
}

/// Two top-level button instances sharing one master.
///
/// `e0btn1` selects `size=large` and carries an ad-hoc title override.
pub fn two_buttons() -> LoadedDocument {
    load(json!({
        "components": {
            BUTTON: {
                "variants": {
                    "size": {
                        "large": {"e0label": {"attributes": {"color": {"value": "red"}}}}
                    }
                }
            }
        },
        "root": {
            "ref": "e0body",
            "children": [
                {
                    "kind": "root",
                    "data": {
                        "ref": "e0btn1",
                        "file": BUTTON,
                        "variants": {"size": "large"},
                        "overrides": {"e0label": {"attributes": {"title": {"value": "Hi"}}}}
                    },
                    "children": [{"ref": "e0label", "componentElement": true}]
                },
                {
                    "kind": "root",
                    "data": {"ref": "e0btn2", "file": BUTTON},
                    "children": [{"ref": "e0label", "componentElement": true}]
                }
            ]
        }
    }))
}

/// A page component with a nested button: page > button > label
pub fn nested_page(page_overrides: Value) -> LoadedDocument {
    load(json!({
        "components": {
            BUTTON: {
                "variants": {
                    "size": {
                        "large": {"e0label": {"attributes": {"color": {"value": "red"}}}}
                    }
                }
            }
        },
        "root": {
            "kind": "root",
            "data": {"ref": "e0page", "file": PAGE, "overrides": page_overrides},
            "children": [{
                "kind": "root",
                "componentElement": true,
                "data": {"ref": "e0btn", "file": BUTTON},
                "children": [{"ref": "e0label", "componentElement": true}]
            }]
        }
    }))
}

/// Session whose host reloads the same document it started from
pub fn session(loaded: LoadedDocument) -> TestSession {
    let host = MockHost::with_document(loaded.clone());
    Session::new(loaded, MemoryStore::new(), host)
        .unwrap()
        .with_project_root(PROJECT)
}

pub fn node(session: &TestSession, reference: &str) -> NodeId {
    session.document().node_by_ref(reference).unwrap()
}
