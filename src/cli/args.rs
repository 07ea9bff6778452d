//! CLI argument definitions using clap
//!
//! Commands:
//! - strongparams permit --spec <json> [--require <key>]
//! - strongparams load
//! - strongparams schema

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// strongparams - permit-list filtering of untrusted input
#[derive(Parser, Debug)]
#[command(name = "strongparams")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter one JSON body from stdin through a permit spec
    Permit {
        /// Permit-list as JSON, e.g. '["title", {"comments_attributes": ["author"]}]'
        #[arg(long)]
        spec: String,

        /// Key to require before permitting
        #[arg(long)]
        require: Option<String>,
    },

    /// Create records from newline-delimited article/comment bodies, then print the index
    Load,

    /// Print the migrated schema
    Schema,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permit() {
        let cli = Cli::try_parse_from([
            "strongparams",
            "permit",
            "--spec",
            r#"["title"]"#,
            "--require",
            "article",
            "--config",
            "app.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("app.json")));
        match cli.command {
            Command::Permit { spec, require } => {
                assert_eq!(spec, r#"["title"]"#);
                assert_eq!(require.as_deref(), Some("article"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_permit_requires_spec() {
        assert!(Cli::try_parse_from(["strongparams", "permit"]).is_err());
    }
}
