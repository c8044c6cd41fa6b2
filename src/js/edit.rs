//! Span-addressed text edits.
//!
//! Rewrites never go through a code generator; each planned change is a
//! replacement of one byte range of the original source, and the full set is
//! spliced in a single pass. Overlapping edits are a planner bug.

use anyhow::{Result, bail};
use swc_common::{BytePos, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub lo: BytePos,
    pub hi: BytePos,
    pub text: String,
}

impl TextEdit {
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            lo: span.lo,
            hi: span.hi,
            text: text.into(),
        }
    }

    pub fn insert(pos: BytePos, text: impl Into<String>) -> Self {
        Self {
            lo: pos,
            hi: pos,
            text: text.into(),
        }
    }
}

/// Splices the edits into `source`. Positions are swc byte positions, offset
/// by the source file's `start_pos`.
pub fn apply_edits(source: &str, start_pos: BytePos, mut edits: Vec<TextEdit>) -> Result<String> {
    edits.sort_by_key(|e| (e.lo, e.hi));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in &edits {
        let lo = (edit.lo.0 - start_pos.0) as usize;
        let hi = (edit.hi.0 - start_pos.0) as usize;
        if lo < cursor {
            bail!("overlapping rewrites at byte {lo}");
        }
        if hi > source.len() {
            bail!("rewrite past end of file at byte {hi}");
        }
        out.push_str(&source[cursor..lo]);
        out.push_str(&edit.text);
        cursor = hi;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}
