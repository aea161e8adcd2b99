//! mongo-pitr CLI entry point
//!
//! Parsing, configuration, dispatch and error reporting all live in the CLI
//! module. This file only maps the outcome to an exit status.

use mongo_pitr::cli;

fn main() {
    if cli::run().is_err() {
        std::process::exit(1);
    }
}
