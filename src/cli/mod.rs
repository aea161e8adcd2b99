//! CLI module for mongo-pitr
//!
//! Provides command-line interface for:
//! - restore: full restore or oplog replay up to a target time
//! - backup full: produce a full backup archive
//! - backup oplog: produce one oplog segment

mod args;
mod commands;
mod errors;
mod io;

pub use args::{BackupCommand, Cli, Command, FullBackupArgs, OplogBackupArgs, RestoreArgs};
pub use commands::{backup_full, backup_oplog, restore, run_command};
pub use errors::{CliError, CliResult};
pub use io::{write_stdout, write_summary};

use tracing::error;

use crate::observability::init_logging;

/// Parse arguments, install logging, run the command, print its summary.
///
/// A failed run reports exactly one terminal error line on stderr before
/// returning: a log event when logging is installed, a plain line otherwise.
/// Callers only map the result to an exit status.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let logging = init_logging(&cli.logging());
    if let Err(e) = &logging {
        eprintln!("{}: {}", e.code(), e);
    }

    let result = run_command(&cli.command).and_then(|summary| write_stdout(&summary));
    if let Err(e) = &result {
        if logging.is_ok() {
            error!(
                event = %cli.command.failure_event(),
                code = e.code(),
                error = %e,
                "run failed"
            );
        } else {
            eprintln!("{}: {}", e.code(), e);
        }
    }
    result
}
