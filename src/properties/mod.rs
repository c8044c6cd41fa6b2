//! Legacy `.properties` resource handling.
//!
//! - `parser`: ordered AST of pairs, comments and blank lines, plus
//!   re-serialization of whatever the migration leaves behind
//! - `metadata`: `# FTL path:` / `# FTL prefix:` directive extraction

pub mod metadata;
pub mod parser;

pub use metadata::{FtlMetadata, get_ftl_metadata};
pub use parser::{PropNode, parse_lines, stringify};
