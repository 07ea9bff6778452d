//! CLI module
//!
//! Provides command-line interface for:
//! - permit: filter one request body through a permit spec
//! - load: create articles/comments and print the index view
//! - schema: print the migrated schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{load, permit, run_command, schema};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};

/// Parse arguments and run; failures are also written as an error envelope
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli).map_err(|e| {
        let _ = write_error(e.code_str(), e.message());
        e
    })
}
