use anyhow::Result;

mod args;
mod exit_status;

pub use args::{Arguments, Command, ListCommand, MigrateCommand};
pub use exit_status::ExitStatus;

use crate::commands::{list, migrate};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Migrate(cmd)) => migrate(cmd),
        Some(Command::List(cmd)) => list(cmd),
        None => Ok(ExitStatus::Success),
    }
}
