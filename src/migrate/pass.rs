//! One migration pass over a JS source and its `.properties` resources.
//!
//! Everything here is in-memory: the caller parses the inputs, the pass
//! plans and applies all rewrites, and the caller decides what to write.
//! Nothing is flushed mid-pass, so a failure leaves the disk untouched.

use anyhow::Result;

use super::prop_data::{PluralConfig, PropData};
use crate::js::{BindingIndex, apply_edits, parser::ParsedJs, rewrite_program};
use crate::migrate::message::apply_migration;

/// Outcome of a full pass, ready for the I/O layer and the report.
pub struct PassOutcome {
    /// The rewritten program text.
    pub js_source: String,
    /// Messages migrated across all resources.
    pub migrated_messages: usize,
    /// Bundle constructions rewritten to `new Localization`.
    pub migrated_bundles: usize,
    /// Lines of the JS source needing manual attention.
    pub fixme_lines: Vec<usize>,
    /// Some call site needed a synchronous formatting context.
    pub requires_sync: bool,
}

/// Rewrites the program against `props` and moves every migrated message out
/// of its `.properties` AST into its Fluent resource.
///
/// CLI-supplied metadata values are echoed into the header of each migrated
/// resource so the directives survive for later passes.
pub fn migrate_js(
    src: &ParsedJs,
    props: &mut [PropData],
    plural: &PluralConfig,
    insert_path: Option<&str>,
    insert_prefix: Option<&str>,
) -> Result<PassOutcome> {
    let bindings = BindingIndex::collect(&src.program);
    let (edits, report) = rewrite_program(src, &bindings, props, plural);
    let js_source = apply_edits(&src.source, src.start_pos, edits)?;

    for prop in props.iter_mut() {
        if !prop.migrations.is_empty() {
            apply_migration(prop, insert_path, insert_prefix);
        }
    }

    Ok(PassOutcome {
        js_source,
        migrated_messages: props.iter().map(|p| p.migrations.len()).sum(),
        migrated_bundles: report.migrated_bundles,
        fixme_lines: report.fixme_lines,
        requires_sync: props.iter().any(|p| p.requires_sync),
    })
}

/// Migrates every message of one resource, without a JS source.
pub fn migrate_properties(
    data: &mut PropData,
    plural: &PluralConfig,
    insert_path: Option<&str>,
    insert_prefix: Option<&str>,
) -> usize {
    for key in data.msg_keys.clone() {
        data.migrate_message(&key, plural);
    }
    apply_migration(data, insert_path, insert_prefix);
    data.migrations.len()
}
