//! JavaScript source analysis and rewriting.
//!
//! The program is parsed once with swc; a single read-only traversal plans
//! the migration as span-addressed text edits, which are then spliced into
//! the original source. Untouched code keeps its formatting byte for byte.
//!
//! - `parser`: swc setup and span-to-source slicing
//! - `bindings`: scope-aware variable binding index
//! - `resolve`: literal resolution through bindings and object literals
//! - `args`: positional formatter arguments to named-argument objects
//! - `rewrite`: the call-site state machine
//! - `edit`: ordered text-edit application

pub mod args;
pub mod bindings;
pub mod edit;
pub mod parser;
pub mod resolve;
pub mod rewrite;

pub use bindings::BindingIndex;
pub use edit::{TextEdit, apply_edits};
pub use parser::{ParsedJs, parse_js_source};
pub use resolve::{ResolvedLiteral, find_source_literal};
pub use rewrite::{PassReport, rewrite_program};
