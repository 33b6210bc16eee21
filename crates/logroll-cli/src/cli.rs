//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Logroll - Incrementally archive rotating text logs into compressed entries.
#[derive(Debug, Parser)]
#[command(name = "logroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LOGROLL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. "debug" or "logroll_archiver=trace"); overrides RUST_LOG
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Archive on every interval boundary until interrupted (default)
    Run,

    /// Run a single merge pass and exit
    Once,

    /// Show what the next pass would do, without writing anything
    Scan(ScanArgs),

    /// Print a decompressed archive entry, or list entries
    Show(ShowArgs),
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Entry name (e.g. jniorboot.log.gz); lists all entries when omitted
    pub entry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["logroll"]);
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_scan_json() {
        let cli = Cli::parse_from(["logroll", "scan", "--json"]);
        match cli.command {
            Some(Command::Scan(args)) => assert!(args.json),
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["logroll", "once", "--config", "/etc/logroll.toml", "-l", "debug"]);
        assert!(matches!(cli.command, Some(Command::Once)));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/logroll.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_show_entry() {
        let cli = Cli::parse_from(["logroll", "show", "jniorboot.log.gz"]);
        match cli.command {
            Some(Command::Show(args)) => assert_eq!(args.entry.as_deref(), Some("jniorboot.log.gz")),
            _ => panic!("Expected Show command"),
        }
    }
}
