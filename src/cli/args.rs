//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `migrate`: migrate a `.properties` file, or a JS source and the
//!   `.properties` bundles it references, to Fluent
//! - `list`: find `.properties` files still awaiting migration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Args)]
pub struct MigrateCommand {
    /// JS source or .properties file to migrate
    pub path: PathBuf,

    /// Repository root, for chrome:// resolution and migration script output
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Bug number for the generated fluent.migrate script
    #[arg(long)]
    pub bug: Option<String>,

    /// Target FTL path, for files without a "# FTL path:" directive
    #[arg(long)]
    pub ftl_path: Option<String>,

    /// Fluent message identifier prefix, for files without "# FTL prefix:"
    #[arg(long)]
    pub ftl_prefix: Option<String>,

    /// Mark KEY as a plural message, with an optional selector variable.
    /// Can be specified multiple times: --plural files=count --plural items
    #[arg(long, value_name = "KEY[=VAR]")]
    pub plural: Vec<String>,

    /// Formatter command to suggest for the rewritten files
    #[arg(long)]
    pub format: Option<String>,

    /// Plan and report the full migration without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Include per-file message counts, bucketed by placeholder count
    #[arg(long)]
    pub counts: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Migrate legacy string bundles and their JS call sites to Fluent
    Migrate(MigrateCommand),
    /// List .properties files under a directory
    List(ListCommand),
}
