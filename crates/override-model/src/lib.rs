//! Component Override Model
//!
//! Storage shapes shared by the override engine and the component store:
//! - `OverrideNode` / `OverrideRecord`: ref-indexed nested override storage
//! - `ComponentData`: the per-instance record carried by a component root
//! - `MasterRecord`: the shared definition of a component and its variants

pub mod component;
pub mod error;
pub mod master;
pub mod node;

pub use component::ComponentData;
pub use error::ModelError;
pub use master::{MasterRecord, VariantMap, VariantRename};
pub use node::{OverrideNode, OverrideRecord};

/// Field marker: a positive value edit.
pub const MARKER_VALUE: &str = "value";

/// Field marker: a positive add edit (classes, attributes without value).
pub const MARKER_ADD: &str = "add";

/// Field marker: the field was removed on this instance.
pub const MARKER_DELETE: &str = "delete";

/// Category keys found inside an override node.
pub mod category {
    pub const ATTRIBUTES: &str = "attributes";
    pub const PROPERTIES: &str = "properties";
    pub const CLASSES: &str = "classes";
    pub const INNER: &str = "inner";
    pub const VARIANTS: &str = "variants";
    pub const CHILDREN: &str = "children";
}
