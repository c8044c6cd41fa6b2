//! Applies resolved migrations to a `.properties` resource.
//!
//! Walks the node list in order, accumulating comment lines and routing
//! `LOCALIZATION NOTE (key):` content to the key it names. Each migrated pair
//! is handed to the Fluent builder and then cut from the list together with
//! its attached comments and trailing blank lines; everything else stays for
//! re-serialization.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::prop_data::PropData;
use crate::fluent::add_fluent_pattern;
use crate::properties::PropNode;

static LOCALIZATION_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^LOCALIZATION NOTE\s*(\([^)]*\))?:?\s*(.*)").unwrap());
static COMMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[!#]\s*").unwrap());

#[derive(Default)]
struct CommentTracker {
    lines: Vec<String>,
    notes: HashMap<String, String>,
}

impl CommentTracker {
    fn push(&mut self, raw: &str) {
        let line = COMMENT_MARKER.replace(raw, "");
        // Ignore editor mode lines.
        if !line.starts_with("-*-") {
            self.lines.push(line.into_owned());
        }
    }

    /// Flushes the accumulated comment. With a key, notes stored for that key
    /// are prepended and the result is returned; without one the buffer is
    /// only drained (the comment stays in the `.properties` file).
    fn take(&mut self, key: Option<&str>) -> Option<String> {
        let mut content = self.lines.join("\n").trim().to_string();
        self.lines.clear();

        let snapshot = content.clone();
        if let Some(caps) = LOCALIZATION_NOTE.captures(&snapshot) {
            content = caps.get(2).map_or("", |m| m.as_str()).to_string();
            if let Some(targets) = caps.get(1) {
                let inner = targets.as_str().trim_matches(|c| c == '(' || c == ')');
                for target in inner.split(|c: char| c == ',' || c.is_whitespace()) {
                    if !target.is_empty() {
                        self.notes.insert(target.to_string(), content.clone());
                    }
                }
            }
        } else if let Some(key) = key
            && let Some(note) = self.notes.get(key)
        {
            content = if content.is_empty() {
                note.clone()
            } else {
                format!("{note}\n{content}")
            };
        }

        match key {
            Some(_) if !content.is_empty() => Some(content),
            _ => None,
        }
    }
}

/// Moves every resolved migration out of the properties AST and into the
/// Fluent resource. Optionally inserts FTL metadata comments supplied on the
/// command line into the file header.
pub fn apply_migration(
    data: &mut PropData,
    insert_path: Option<&str>,
    insert_prefix: Option<&str>,
) {
    let mut tracker = CommentTracker::default();
    let mut i: usize = 0;
    // Cut ranges start after the last node that survives.
    let mut next_cut_after: isize = -1;

    while i < data.ast.len() {
        match &data.ast[i] {
            PropNode::EmptyLine => {
                // Comments not immediately before a migrated message are kept.
                tracker.take(None);
                next_cut_after = i as isize;
                i += 1;
            }
            PropNode::Comment { text } => {
                tracker.push(text);
                i += 1;
            }
            PropNode::Pair { key, value } => {
                let key = key.clone();
                let value = value.clone();
                match data.migration(&key).cloned() {
                    Some(migration) => {
                        let comment = tracker.take(Some(&key));
                        add_fluent_pattern(
                            &mut data.ftl,
                            &mut data.transforms,
                            &key,
                            &value,
                            comment,
                            &migration,
                        );
                        // Cut the pair, its comments, and any blank lines after it.
                        let mut end = i;
                        while matches!(data.ast.get(end + 1), Some(PropNode::EmptyLine)) {
                            end += 1;
                        }
                        let start = (next_cut_after + 1) as usize;
                        data.ast.drain(start..=end);
                        i = start;
                    }
                    None => {
                        tracker.take(None);
                        next_cut_after = i as isize;
                        i += 1;
                    }
                }
            }
        }
    }

    if insert_path.is_some() || insert_prefix.is_some() {
        insert_metadata(&mut data.ast, insert_path, insert_prefix);
    }
}

fn insert_metadata(ast: &mut Vec<PropNode>, path: Option<&str>, prefix: Option<&str>) {
    let mut insert = Vec::new();
    if let Some(path) = path {
        insert.push(PropNode::Comment {
            text: format!("# FTL path: {path}"),
        });
    }
    if let Some(prefix) = prefix {
        insert.push(PropNode::Comment {
            text: format!("# FTL prefix: {prefix}"),
        });
    }

    let mut pos = 0;
    while matches!(ast.get(pos), Some(PropNode::Comment { .. })) {
        pos += 1;
    }
    if pos > 0 {
        insert.insert(0, PropNode::EmptyLine);
    }
    if !matches!(ast.get(pos), Some(PropNode::EmptyLine)) {
        insert.push(PropNode::EmptyLine);
    }
    ast.splice(pos..pos, insert);
}
