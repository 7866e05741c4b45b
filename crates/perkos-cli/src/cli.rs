//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use perkos_validators::Catalog;
use std::io::IsTerminal;
use std::path::PathBuf;

/// PerkOS CLI - Validate AI requests and x402 payment payloads
///
/// Runs JSON or YAML documents through the shared PerkOS rule sets and
/// reports every violation with its path and code.
#[derive(Parser, Debug)]
#[command(
    name = "perkos",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PERKOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one document against a rule set
    Check(CheckArgs),

    /// Validate every document of an array against a rule set
    Batch(BatchArgs),

    /// List the registered rule sets
    List(ListArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Rule set name, e.g. image-generate or payment-envelope
    #[arg(value_name = "RULE_SET")]
    pub rule_set: String,

    /// Path to the document (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat every field as optional
    #[arg(long, conflicts_with = "all_required")]
    pub partial: bool,

    /// Treat every field as required
    #[arg(long)]
    pub all_required: bool,

    /// Print the normalized value on success
    #[arg(long)]
    pub show_value: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Rule set name
    #[arg(value_name = "RULE_SET")]
    pub rule_set: String,

    /// Path to a JSON or YAML array of documents
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Stop at the first rejected document
    #[arg(long)]
    pub fail_fast: bool,

    /// Stop once this many documents were rejected (0 = unlimited)
    #[arg(long, value_name = "COUNT")]
    pub max_errors: Option<usize>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list rule sets of one catalog
    #[arg(long, value_enum)]
    pub catalog: Option<CatalogArg>,

    /// Show the field table of object rule sets
    #[arg(long)]
    pub fields: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Rule set catalogs
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogArg {
    /// AI feature requests
    Ai,
    /// x402 payment values
    Payment,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<CatalogArg> for Catalog {
    fn from(catalog: CatalogArg) -> Self {
        match catalog {
            CatalogArg::Ai => Catalog::Ai,
            CatalogArg::Payment => Catalog::Payment,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::List(ListArgs {
                catalog: None,
                fields: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_check_flags() {
        let cli = Cli::parse_from(["perkos", "check", "image-generate", "req.json", "--partial"]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.rule_set, "image-generate");
                assert_eq!(args.file, PathBuf::from("req.json"));
                assert!(args.partial);
                assert!(!args.all_required);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let conflict = Cli::try_parse_from([
            "perkos",
            "check",
            "image-generate",
            "req.json",
            "--partial",
            "--all-required",
        ]);
        assert!(conflict.is_err());
    }

    #[test]
    fn test_batch_and_list_flags() {
        let cli = Cli::parse_from([
            "perkos",
            "--output",
            "json-pretty",
            "batch",
            "payment-header",
            "headers.yaml",
            "--max-errors",
            "3",
        ]);
        assert_eq!(cli.output, OutputFormat::JsonPretty);
        match cli.command {
            Commands::Batch(args) => {
                assert_eq!(args.max_errors, Some(3));
                assert!(!args.fail_fast);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["perkos", "list", "--catalog", "payment"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.catalog.map(Catalog::from), Some(Catalog::Payment));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
