//! Report formatting and printing.
//!
//! Separate from the migration logic so the library stays free of printing
//! side effects.

use std::path::PathBuf;

use colored::Colorize;

/// Everything one `migrate` invocation wants to tell the user.
#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub messages: usize,
    pub bundles: usize,
    /// `.properties` files messages were migrated out of.
    pub sources: Vec<PathBuf>,
    /// FTL files written or updated.
    pub targets: Vec<PathBuf>,
    pub script: Option<PathBuf>,
    /// JS source lines flagged with L10N-FIXME markers.
    pub fixme_lines: Vec<usize>,
    pub dry_run: bool,
    /// Formatter command the user configured; suggested, never executed.
    pub format_hint: Option<String>,
}

impl MigrationSummary {
    pub fn needs_manual_work(&self) -> bool {
        !self.fixme_lines.is_empty()
    }
}

pub fn print_summary(summary: &MigrationSummary) {
    let verb = if summary.dry_run {
        "Would migrate".yellow().bold()
    } else {
        "Migrated".green().bold()
    };
    println!(
        "{} {} message(s), {} bundle reference(s)",
        verb, summary.messages, summary.bundles
    );
    for source in &summary.sources {
        println!("  from {}", source.display());
    }
    for target in &summary.targets {
        println!("  to   {}", target.display());
    }
    if let Some(script) = &summary.script {
        println!("  with migration recipe {}", script.display());
    }

    if summary.needs_manual_work() {
        let lines: Vec<String> = summary.fixme_lines.iter().map(usize::to_string).collect();
        println!(
            "{} Manual work needed at or near line(s): {}",
            "!!!".red().bold(),
            lines.join(", ")
        );
    }

    if let Some(format) = &summary.format_hint
        && !summary.dry_run
    {
        println!(
            "Run {} on the rewritten files to format them.",
            format.cyan()
        );
    }
}

/// One row of `list` output.
#[derive(Debug)]
pub struct ListedFile {
    pub path: PathBuf,
    /// Message counts bucketed by placeholder count: `buckets[n]` holds the
    /// number of messages with `n` placeholders.
    pub buckets: Option<Vec<usize>>,
}

pub fn print_listing(files: &[ListedFile]) {
    for file in files {
        match &file.buckets {
            None => println!("{}", file.path.display()),
            Some(buckets) => {
                let total: usize = buckets.iter().sum();
                let shape: Vec<String> = buckets
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| **n > 0)
                    .map(|(vars, n)| format!("{n} with {vars} var(s)"))
                    .collect();
                println!(
                    "{}  {} message(s){}{}",
                    file.path.display(),
                    total,
                    if shape.is_empty() { "" } else { ": " },
                    shape.join(", ").dimmed()
                );
            }
        }
    }
    if files.is_empty() {
        println!("{}", "No .properties files found.".dimmed());
    }
}
