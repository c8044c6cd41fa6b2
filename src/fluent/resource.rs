//! Target FTL resource loading and lookups.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fluent_syntax::{ast, parser, serializer};

const MPL_LICENSE_HEADER: [&str; 3] = [
    "This Source Code Form is subject to the terms of the Mozilla Public",
    "License, v. 2.0. If a copy of the MPL was not distributed with this",
    "file, You can obtain one at http://mozilla.org/MPL/2.0/.",
];

/// Loads the target resource, or creates a fresh one carrying the license
/// header when the file does not exist yet.
///
/// Parse errors recover partially: whatever parsed is used for collision
/// checks, the junk is preserved by the serializer.
pub fn load_or_create(path: Option<&Path>) -> Result<ast::Resource<String>> {
    let Some(path) = path else {
        return Ok(ast::Resource { body: Vec::new() });
    };
    if !path.exists() {
        return Ok(ast::Resource {
            body: vec![ast::Entry::Comment(ast::Comment {
                content: MPL_LICENSE_HEADER.iter().map(|s| s.to_string()).collect(),
            })],
        });
    }
    let src = fs::read_to_string(path)
        .with_context(|| format!("Failed to read FTL file: {}", path.display()))?;
    Ok(match parser::parse(src) {
        Ok(res) => res,
        Err((res, _)) => res,
    })
}

pub fn serialize_resource(res: &ast::Resource<String>) -> String {
    serializer::serialize(res)
}

/// Index of the message with the given identifier in the resource body.
///
/// Entries are addressed by index rather than held references so the body
/// can be grown while messages are being updated.
pub fn message_index(res: &ast::Resource<String>, key: &str) -> Option<usize> {
    res.body.iter().position(|entry| {
        matches!(entry, ast::Entry::Message(msg) if msg.id.name == key)
    })
}

pub fn key_exists(res: &ast::Resource<String>, key: &str) -> bool {
    message_index(res, key).is_some()
}
