//! FTL metadata directives in `.properties` headers.
//!
//! Migrations are driven by comments of the form:
//!
//! ```text
//! # FTL path: toolkit/locales/en-US/toolkit/global/unknownContentType.ftl
//! # FTL prefix: unknowncontenttype
//! ```
//!
//! A duplicate directive or an invalid prefix is fatal for that file's
//! migration; guessing here would silently misroute strings.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use regex::Regex;

use super::parser::PropNode;

/// Parsed FTL target metadata for one `.properties` file.
#[derive(Debug, Clone, Default)]
pub struct FtlMetadata {
    /// Target path relative to `ftl_root`, `/`-separated.
    pub ftl_path: Option<String>,
    /// Localization root the target path is resolved against.
    pub ftl_root: Option<PathBuf>,
    /// Fluent message key prefix, kebab-case alphabet only.
    pub ftl_prefix: String,
}

impl FtlMetadata {
    /// Absolute (root-joined) path of the target FTL file, when configured.
    pub fn target_path(&self) -> Option<PathBuf> {
        match (&self.ftl_root, &self.ftl_path) {
            (Some(root), Some(path)) => Some(root.join(path)),
            _ => None,
        }
    }
}

/// Extracts FTL metadata from the resource's comments, with CLI overrides.
///
/// CLI values count as a first occurrence, so a directive on top of a CLI
/// override is reported as a duplicate.
pub fn get_ftl_metadata(
    prop_path: &Path,
    ast: &[PropNode],
    cli_path: Option<&str>,
    cli_prefix: Option<&str>,
) -> Result<FtlMetadata> {
    let directive = Regex::new(r"^[!#]\s*FTL\s+(path|prefix):(.*)").unwrap();

    let mut raw_path = cli_path.map(str::to_string);
    let mut prefix = cli_prefix.unwrap_or("").to_string();

    for node in ast {
        let PropNode::Comment { text } = node else {
            continue;
        };
        let Some(caps) = directive.captures(text) else {
            continue;
        };
        let value = caps[2].trim().to_string();
        match &caps[1] {
            "path" => {
                if raw_path.is_some() {
                    bail!("FTL path set more than once for {}", prop_path.display());
                }
                raw_path = Some(value);
            }
            _ => {
                if !prefix.is_empty() {
                    bail!("FTL prefix set more than once for {}", prop_path.display());
                }
                if value.chars().any(|c| !matches!(c, 'a'..='z' | '-')) {
                    bail!(
                        "Invalid FTL prefix \"{}\" in {}",
                        value,
                        prop_path.display()
                    );
                }
                prefix = value;
            }
        }
    }

    let (ftl_path, ftl_root) = match raw_path {
        Some(raw) => {
            let (path, root) = parse_ftl_path(prop_path, &raw)?;
            (Some(path), Some(root))
        }
        None => (None, None),
    };

    Ok(FtlMetadata {
        ftl_path,
        ftl_root,
        ftl_prefix: prefix,
    })
}

/// Splits a raw FTL path at its `en-US` component into (path, root).
///
/// A path without `en-US` falls back to the `.properties` file's own
/// localization root.
fn parse_ftl_path(prop_path: &Path, raw: &str) -> Result<(String, PathBuf)> {
    let mut parts: Vec<&str> = raw.split('/').collect();

    let root = match parts.iter().position(|p| *p == "en-US") {
        Some(i) => {
            let root: PathBuf = parts.drain(..=i).collect();
            root
        }
        None => prop_locale_root(prop_path).ok_or_else(|| {
            anyhow!("A full FTL file path is required for {}", prop_path.display())
        })?,
    };

    let path = parts.join("/");
    if !path.ends_with(".ftl") {
        bail!(
            "FTL file path should be fully qualified with an .ftl extension for {}",
            prop_path.display()
        );
    }
    Ok((path, root))
}

fn prop_locale_root(prop_path: &Path) -> Option<PathBuf> {
    let mut root = PathBuf::new();
    for comp in prop_path.components() {
        root.push(comp);
        if comp.as_os_str() == "en-US" {
            return Some(root);
        }
    }
    None
}
