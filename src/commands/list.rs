//! The `list` command: find `.properties` files still awaiting migration.

use std::fs;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::cli::{ExitStatus, ListCommand};
use crate::fluent::count_placeholders;
use crate::properties::{PropNode, parse_lines};
use crate::report::{ListedFile, print_listing};

pub fn list(cmd: ListCommand) -> Result<ExitStatus> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&cmd.path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) != Some("properties") {
            continue;
        }

        let buckets = if cmd.counts {
            let src = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut buckets: Vec<usize> = Vec::new();
            for node in parse_lines(&src) {
                if let PropNode::Pair { value, .. } = node {
                    let vars = count_placeholders(&value);
                    if buckets.len() <= vars {
                        buckets.resize(vars + 1, 0);
                    }
                    buckets[vars] += 1;
                }
            }
            Some(buckets)
        } else {
            None
        };
        files.push(ListedFile { path, buckets });
    }

    print_listing(&files);
    Ok(ExitStatus::Success)
}
