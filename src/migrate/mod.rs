//! Migration engine: key resolution, per-resource pass state, the
//! properties-side application of migrations, and transform descriptors.

pub mod keys;
pub mod message;
pub mod pass;
pub mod prop_data;
pub mod transform;

pub use keys::{kebab_case, resolve_ftl_key, split_attr};
pub use message::apply_migration;
pub use pass::{PassOutcome, migrate_js, migrate_properties};
pub use prop_data::{MessageMigration, PluralConfig, PluralSelector, PropData};
pub use transform::{
    AttrTransform, MessageTransform, PatternTransform, Replacement, ScriptMeta,
    stringify_transforms,
};
