//! `<stringbundle>` extraction from XHTML/XUL markup.
//!
//! The documents are not parsed as XML; the elements of interest are
//! self-closing singletons on their own line, and a regex keeps the rest of
//! the document byte-identical when tags are cut.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

static BUNDLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*<stringbundle\b([^>]*)/>([ \t]*\n)?").unwrap());
static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)\s*=\s*"([^"]*)""#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBundleRef {
    /// Element id JS reaches the bundle through.
    pub id: String,
    /// chrome:// URI of the `.properties` file.
    pub src: String,
}

/// All `<stringbundle>` elements in a document. A tag without both `id` and
/// `src` cannot be migrated or safely skipped, so it is an error.
pub fn find_string_bundles(source: &str) -> Result<Vec<StringBundleRef>> {
    let mut bundles = Vec::new();
    for caps in BUNDLE_TAG.captures_iter(source) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let mut id = None;
        let mut src = None;
        for attr in ATTR.captures_iter(attrs) {
            match &attr[1] {
                "id" => id = Some(attr[2].to_string()),
                "src" => src = Some(attr[2].to_string()),
                _ => {}
            }
        }
        match (id, src) {
            (Some(id), Some(src)) => bundles.push(StringBundleRef { id, src }),
            _ => bail!("stringbundle element without id/src: {}", caps[0].trim()),
        }
    }
    Ok(bundles)
}

/// Removes the `<stringbundle>` elements whose `src` is in `migrated`,
/// together with their line's leading indentation and trailing newline.
pub fn remove_bundle_tags(source: &str, migrated: &HashSet<String>) -> String {
    BUNDLE_TAG
        .replace_all(source, |caps: &regex::Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let keeps = !ATTR
                .captures_iter(attrs)
                .any(|a| &a[1] == "src" && migrated.contains(&a[2]));
            if keeps { caps[0].to_string() } else { String::new() }
        })
        .into_owned()
}
