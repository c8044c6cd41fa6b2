//! Fluent (FTL) target resource handling.
//!
//! - `resource`: load-or-create the target resource, key lookups
//! - `pattern`: printf-style placeholder translation into Fluent patterns
//! - `builder`: incremental message/attribute construction with comment
//!   migration

pub mod builder;
pub mod pattern;
pub mod resource;

pub use builder::add_fluent_pattern;
pub use pattern::{PlaceholderUse, TranslatedPattern, count_placeholders, translate_pattern};
pub use resource::{key_exists, load_or_create, message_index, serialize_resource};
