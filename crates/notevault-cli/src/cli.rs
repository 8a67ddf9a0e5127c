use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use notevault_core::VERSION;

use crate::constants::CONFIG_ENV;

/// NoteVault - store notes encrypted under a passkey, retrieve them by id
#[derive(Parser)]
#[command(name = "notevault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols instead of unicode
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Output format (plain)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive vault session (default)
    Session,

    /// Process JSON-lines requests from stdin against one vault
    Batch,

    /// Hash a master password for the config file
    HashMaster(HashMasterArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `hash-master` command
#[derive(Args)]
pub struct HashMasterArgs {
    /// Store the hash in the config file
    #[arg(long)]
    pub write: bool,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["notevault"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_hash_master_flags() {
        let cli = Cli::try_parse_from(["notevault", "hash-master", "--write", "--stdin"]).unwrap();
        match cli.command {
            Some(Commands::HashMaster(args)) => {
                assert!(args.write);
                assert!(args.stdin);
            }
            _ => panic!("expected hash-master"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "notevault",
            "batch",
            "--config",
            "/tmp/nv.toml",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/nv.toml"));
        assert!(cli.no_color);
    }
}
