//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Base for relative component paths (default: ".")
    pub project_root: String,

    /// Directory of persisted master records, under the project root
    /// (default: "components")
    pub store_dir: String,

    /// Rename log file, under the store directory
    /// (default: "variant-renames.jsonl")
    pub rename_log: String,

    /// Log filter used when RUST_LOG is unset (default: "warn")
    pub log_filter: String,

    /// Class put on overridden fields (default: "override")
    pub override_class: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            project_root: ".".to_string(),
            store_dir: "components".to_string(),
            rename_log: component_store::DEFAULT_RENAME_LOG.to_string(),
            log_filter: "warn".to_string(),
            override_class: crate::highlight::DEFAULT_OVERRIDE_CLASS.to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "project_root": self.project_root,
            "store_dir": self.store_dir,
            "rename_log": self.rename_log,
            "log_filter": self.log_filter,
            "highlight": {
                "override_class": self.override_class
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.store_dir, "components");
        assert_eq!(defaults.rename_log, "variant-renames.jsonl");
        assert_eq!(defaults.log_filter, "warn");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();
        assert_eq!(value["project_root"], ".");
        assert_eq!(value["highlight"]["override_class"], "override");
    }
}
