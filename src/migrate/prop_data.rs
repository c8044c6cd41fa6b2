//! Per-resource migration state.
//!
//! A `PropData` is created fresh for each `.properties` file taking part in a
//! pass and carries everything the pass accumulates for it: the parsed node
//! list, the target FTL resource, the key migrations resolved so far and the
//! transform descriptors. Nothing survives the pass.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fluent_syntax::ast;

use super::keys::{kebab_case, resolve_ftl_key, split_attr};
use super::transform::MessageTransform;
use crate::fluent::{count_placeholders, key_exists, load_or_create};
use crate::properties::{FtlMetadata, PropNode, get_ftl_metadata, parse_lines};

/// Plural handling for one legacy key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PluralSelector {
    /// Not a plural string.
    #[default]
    NotPlural,
    /// Plural string, selector name still needed from a human.
    Placeholder,
    /// Plural string keyed on the named variable.
    Named(String),
}

impl PluralSelector {
    pub fn is_plural(&self) -> bool {
        !matches!(self, PluralSelector::NotPlural)
    }

    /// Selector variable name; the placeholder is surfaced as `FIXME`.
    pub fn name(&self) -> Option<&str> {
        match self {
            PluralSelector::NotPlural => None,
            PluralSelector::Placeholder => Some("FIXME"),
            PluralSelector::Named(name) => Some(name),
        }
    }
}

/// Per-key plural configuration from the command line.
#[derive(Debug, Clone, Default)]
pub struct PluralConfig {
    map: HashMap<String, PluralSelector>,
}

impl PluralConfig {
    /// Parses `KEY` or `KEY=VAR` specs.
    pub fn parse(specs: &[String]) -> Self {
        let mut map = HashMap::new();
        for spec in specs {
            match spec.split_once('=') {
                Some((key, var)) => {
                    map.insert(key.to_string(), PluralSelector::Named(var.to_string()));
                }
                None => {
                    map.insert(spec.to_string(), PluralSelector::Placeholder);
                }
            }
        }
        Self { map }
    }

    pub fn selector_for(&self, key: &str) -> PluralSelector {
        self.map.get(key).cloned().unwrap_or_default()
    }
}

/// Resolved migration interface of one legacy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMigration {
    /// Target Fluent message identifier.
    pub ftl_key: String,
    /// Kebab-cased attribute name, for `base.attr` keys.
    pub attr: Option<String>,
    pub plural: PluralSelector,
    /// Variable name per placeholder position; only ever extended.
    pub var_names: Vec<String>,
}

/// One `.properties` file and everything a pass knows about it.
pub struct PropData {
    pub path: PathBuf,
    /// chrome:// URI this file was referenced by, when found via the JS.
    pub uri: Option<String>,
    pub ast: Vec<PropNode>,
    pub msg_keys: Vec<String>,
    pub meta: FtlMetadata,
    pub ftl: ast::Resource<String>,
    /// Key migrations in resolution order.
    pub migrations: Vec<(String, MessageMigration)>,
    pub transforms: Vec<MessageTransform>,
    /// A call site needed the synchronous formatting API.
    pub requires_sync: bool,
}

impl PropData {
    pub fn parse(path: &Path, cli_path: Option<&str>, cli_prefix: Option<&str>) -> Result<Self> {
        let src = fs::read_to_string(path)
            .with_context(|| format!("Failed to read properties file: {}", path.display()))?;
        Self::from_source(path, &src, cli_path, cli_prefix)
    }

    pub fn from_source(
        path: &Path,
        src: &str,
        cli_path: Option<&str>,
        cli_prefix: Option<&str>,
    ) -> Result<Self> {
        let ast = parse_lines(src);
        let meta = get_ftl_metadata(path, &ast, cli_path, cli_prefix)?;
        let ftl = load_or_create(meta.target_path().as_deref())?;
        let msg_keys = ast
            .iter()
            .filter_map(|node| match node {
                PropNode::Pair { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect();
        Ok(Self {
            path: path.to_path_buf(),
            uri: None,
            ast,
            msg_keys,
            meta,
            ftl,
            migrations: Vec::new(),
            transforms: Vec::new(),
            requires_sync: false,
        })
    }

    /// Whether this resource has a migration target configured.
    pub fn has_ftl(&self) -> bool {
        self.meta.ftl_path.is_some()
    }

    pub fn migration(&self, prop_key: &str) -> Option<&MessageMigration> {
        self.migrations
            .iter()
            .find(|(k, _)| k == prop_key)
            .map(|(_, m)| m)
    }

    pub fn raw_value(&self, prop_key: &str) -> Option<&str> {
        self.ast.iter().find_map(|node| match node {
            PropNode::Pair { key, value } if key == prop_key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Determines the key's Fluent interface, resolving it on first use.
    ///
    /// Placeholder positions get their default `var{N}` names here, so the
    /// names are fixed before any call-site argument normalization sees them.
    pub fn migrate_message(&mut self, prop_key: &str, plural: &PluralConfig) -> MessageMigration {
        if let Some(prev) = self.migration(prop_key) {
            return prev.clone();
        }

        let (base, attr) = split_attr(prop_key);
        let attr_root = format!("{base}.");
        let reuse = self
            .migrations
            .iter()
            .find(|(k, _)| k == base || k.starts_with(&attr_root))
            .map(|(_, m)| m.ftl_key.clone());

        let ftl_key = resolve_ftl_key(base, &self.meta.ftl_prefix, reuse.as_deref(), |key| {
            key_exists(&self.ftl, key) || self.migrations.iter().any(|(_, m)| m.ftl_key == key)
        });

        let positions = self.raw_value(prop_key).map_or(0, count_placeholders);
        let selector = plural.selector_for(prop_key);
        // A named plural keys its placeholders on the selector variable;
        // everything else gets positional defaults.
        let var_names = match &selector {
            PluralSelector::Named(name) => vec![name.clone(); positions],
            _ => (1..=positions).map(|n| format!("var{n}")).collect(),
        };
        let migration = MessageMigration {
            ftl_key,
            attr: attr.map(kebab_case),
            plural: selector,
            var_names,
        };
        self.migrations
            .push((prop_key.to_string(), migration.clone()));
        migration
    }

    /// Extends a key's variable names past the known positions. Existing
    /// names are never renamed or removed.
    pub fn extend_var_names(&mut self, prop_key: &str, names: &[String]) {
        if let Some((_, m)) = self.migrations.iter_mut().find(|(k, _)| k == prop_key) {
            for name in names.iter().skip(m.var_names.len()) {
                m.var_names.push(name.clone());
            }
        }
    }
}
