//! The `migrate` command: the I/O shell around a migration pass.
//!
//! Inputs are fully read and parsed, the pass runs in memory, and only a
//! successful pass writes anything back. A `.properties` argument migrates
//! the whole file; a JS argument migrates the messages its call sites reach,
//! discovering bundles through chrome:// literals and XHTML `<stringbundle>`
//! elements.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::cli::{ExitStatus, MigrateCommand};
use crate::fluent::serialize_resource;
use crate::js::parse_js_source;
use crate::migrate::{
    PluralConfig, PropData, ScriptMeta, migrate_js, migrate_properties, stringify_transforms,
};
use crate::properties::stringify;
use crate::refs::{
    StringBundleRef, collect_chrome_refs, find_string_bundles, remove_bundle_tags,
    resolve_chrome_uri,
};
use crate::report::{MigrationSummary, print_summary};

pub fn migrate(cmd: MigrateCommand) -> Result<ExitStatus> {
    let plural = PluralConfig::parse(&cmd.plural);
    let summary = match cmd.path.extension().and_then(|e| e.to_str()) {
        Some("properties") => migrate_properties_file(&cmd, &plural)?,
        _ => migrate_js_file(&cmd, &plural)?,
    };
    print_summary(&summary);
    Ok(if summary.needs_manual_work() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}

fn migrate_properties_file(cmd: &MigrateCommand, plural: &PluralConfig) -> Result<MigrationSummary> {
    let mut data = PropData::parse(&cmd.path, cmd.ftl_path.as_deref(), cmd.ftl_prefix.as_deref())?;
    if !data.has_ftl() {
        bail!(
            "{} has no FTL target; add a \"# FTL path:\" directive or pass --ftl-path",
            cmd.path.display()
        );
    }

    let messages = migrate_properties(
        &mut data,
        plural,
        cmd.ftl_path.as_deref(),
        cmd.ftl_prefix.as_deref(),
    );

    let mut summary = MigrationSummary {
        messages,
        sources: vec![cmd.path.clone()],
        dry_run: cmd.dry_run,
        format_hint: cmd.format.clone(),
        ..Default::default()
    };
    finish_resources(cmd, std::slice::from_ref(&data), &mut summary)?;
    Ok(summary)
}

fn migrate_js_file(cmd: &MigrateCommand, plural: &PluralConfig) -> Result<MigrationSummary> {
    let source = fs::read_to_string(&cmd.path)
        .with_context(|| format!("Failed to read {}", cmd.path.display()))?;
    let parsed = parse_js_source(source, &cmd.path.to_string_lossy())?;

    let refs = collect_chrome_refs(&parsed.program);
    let mut prop_uris = refs.properties.clone();

    // XHTML documents contribute their <stringbundle> sources to the pass.
    let mut documents: Vec<(PathBuf, String, Vec<StringBundleRef>)> = Vec::new();
    for uri in &refs.xhtml {
        let Some(path) = resolve_unique(&cmd.root, uri) else {
            continue;
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let bundles = find_string_bundles(&text)?;
        for bundle in &bundles {
            if !prop_uris.contains(&bundle.src) {
                prop_uris.push(bundle.src.clone());
            }
        }
        documents.push((path, text, bundles));
    }

    let mut props: Vec<PropData> = Vec::new();
    for uri in &prop_uris {
        let Some(path) = resolve_unique(&cmd.root, uri) else {
            continue;
        };
        let mut data =
            PropData::parse(&path, cmd.ftl_path.as_deref(), cmd.ftl_prefix.as_deref())?;
        data.uri = Some(uri.clone());
        if !data.has_ftl() {
            warn(&format!(
                "{} has no FTL metadata; its messages will not be migrated",
                path.display()
            ));
        }
        props.push(data);
    }
    if props.is_empty() {
        bail!(
            "No .properties bundles resolved from {}",
            cmd.path.display()
        );
    }
    if !props.iter().any(PropData::has_ftl) {
        bail!("None of the referenced .properties files has an FTL target");
    }

    let outcome = migrate_js(
        &parsed,
        &mut props,
        plural,
        cmd.ftl_path.as_deref(),
        cmd.ftl_prefix.as_deref(),
    )?;

    let mut summary = MigrationSummary {
        messages: outcome.migrated_messages,
        bundles: outcome.migrated_bundles,
        sources: props
            .iter()
            .filter(|p| !p.migrations.is_empty())
            .map(|p| p.path.clone())
            .collect(),
        fixme_lines: outcome.fixme_lines,
        dry_run: cmd.dry_run,
        format_hint: cmd.format.clone(),
        ..Default::default()
    };

    if !cmd.dry_run && outcome.js_source != parsed.source {
        fs::write(&cmd.path, &outcome.js_source)
            .with_context(|| format!("Failed to write {}", cmd.path.display()))?;
    }
    finish_resources(cmd, &props, &mut summary)?;

    if !cmd.dry_run {
        let migrated_srcs: HashSet<String> = props
            .iter()
            .filter(|p| !p.migrations.is_empty())
            .filter_map(|p| p.uri.clone())
            .collect();
        for (path, text, bundles) in &documents {
            if !bundles.iter().any(|b| migrated_srcs.contains(&b.src)) {
                continue;
            }
            let cleaned = remove_bundle_tags(text, &migrated_srcs);
            if cleaned != *text {
                fs::write(path, cleaned)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
    }
    Ok(summary)
}

/// Writes each migrated resource's FTL target, its `.properties` remainder
/// (or deletes an emptied file), and the fluent.migrate recipe.
fn finish_resources(
    cmd: &MigrateCommand,
    props: &[PropData],
    summary: &mut MigrationSummary,
) -> Result<()> {
    for prop in props.iter().filter(|p| !p.migrations.is_empty()) {
        let Some(target) = prop.meta.target_path() else {
            continue;
        };
        summary.targets.push(target.clone());

        let script = script_path(cmd, &target)?;
        if let Some(script) = &script {
            summary.script = Some(script.clone());
        }
        if cmd.dry_run {
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, serialize_resource(&prop.ftl))
            .with_context(|| format!("Failed to write {}", target.display()))?;

        if prop.ast.iter().any(|n| n.is_pair()) {
            fs::write(&prop.path, stringify(&prop.ast))
                .with_context(|| format!("Failed to write {}", prop.path.display()))?;
        } else {
            fs::remove_file(&prop.path)
                .with_context(|| format!("Failed to delete {}", prop.path.display()))?;
        }

        if let Some(script) = &script {
            if let Some(parent) = script.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let meta = ScriptMeta {
                bug: cmd.bug.clone().unwrap_or_default(),
                title: format!("Migrate {} to Fluent", file_name(&prop.path)),
            };
            let py = stringify_transforms(&cmd.root, &prop.path, &target, &prop.transforms, &meta);
            fs::write(script, py)
                .with_context(|| format!("Failed to write {}", script.display()))?;
        }
    }
    Ok(())
}

/// Recipe path under the root, or `None` (with a warning) without `--bug`.
fn script_path(cmd: &MigrateCommand, target: &Path) -> Result<Option<PathBuf>> {
    let Some(bug) = &cmd.bug else {
        warn("no --bug given; skipping the fluent.migrate recipe");
        return Ok(None);
    };
    let stem = target
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace('-', "_"))
        .unwrap_or_else(|| "strings".to_string());
    Ok(Some(cmd.root.join(format!(
        "python/l10n/fluent_migrations/bug_{bug}_{stem}.py"
    ))))
}

/// The unique on-disk file for a chrome:// URI; unresolved and ambiguous
/// URIs are warned about and skipped, never guessed.
fn resolve_unique(root: &Path, uri: &str) -> Option<PathBuf> {
    let mut candidates = resolve_chrome_uri(root, uri);
    match candidates.len() {
        1 => candidates.pop(),
        0 => {
            warn(&format!("could not resolve {uri} under the root"));
            None
        }
        _ => {
            warn(&format!("{uri} matches more than one en-US file; skipped"));
            None
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn warn(message: &str) {
    eprintln!("{} {message}", "Warning:".yellow().bold());
}
