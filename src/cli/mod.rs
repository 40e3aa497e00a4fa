//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// GemPlay QA suite runner
#[derive(Parser, Debug)]
#[command(name = "gemplay-qa")]
#[command(version = "0.1.0")]
#[command(about = "Run QA scenarios against a GemPlay deployment")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run QA scenarios
    Test(TestArgs),

    /// List available scenarios and profiles
    List(ListArgs),

    /// Observe live bot activity for cycle violations
    Probe(ProbeArgs),

    /// View stored suite results
    Results(ResultsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Target environment name
    #[arg(short, long, default_value = "preview")]
    pub env: String,

    /// API base URL (overrides the configured environment)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Specific scenario number to run (1-14)
    #[arg(short, long)]
    pub scenario: Option<u8>,

    /// Suite profile to run (smoke, auth, economy, games, bots, full)
    #[arg(long)]
    pub profile: Option<String>,

    /// Run all scenarios
    #[arg(short, long)]
    pub all: bool,

    /// Number of suite rounds
    #[arg(short, long, default_value = "1")]
    pub rounds: u32,

    /// Run scenarios in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of concurrent scenarios (when parallel)
    #[arg(short, long, default_value = "4")]
    pub concurrent: usize,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Skip specific scenarios (comma-separated numbers)
    #[arg(long)]
    pub skip: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Admin email for admin-only scenarios
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Admin password for admin-only scenarios
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Save results to a file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Store the run in the results directory
    #[arg(long)]
    pub save: bool,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show detailed scenario information
    #[arg(short, long)]
    pub detailed: bool,

    /// Show only the category summary
    #[arg(short, long)]
    pub categories: bool,

    /// Show suite profiles
    #[arg(short, long)]
    pub profiles: bool,
}

/// Arguments for probe command
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Target environment name
    #[arg(short, long, default_value = "preview")]
    pub env: String,

    /// API base URL (overrides the configured environment)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Seconds between snapshots
    #[arg(short, long, default_value = "10")]
    pub interval: u64,

    /// Number of snapshots to take
    #[arg(short, long, default_value = "6")]
    pub samples: u32,

    /// Admin email
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Admin password
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Show comparison summary across environments
    #[arg(short, long)]
    pub summary: bool,

    /// Filter by environment
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Export report to file (.md or .txt)
    #[arg(short = 'x', long)]
    pub export: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./gemplay-qa.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variable overrides instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path (default: first found)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// List suite profiles
    Profiles {
        /// Show detailed profile information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show a single suite profile
    Profile {
        /// Profile name
        name: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. app.timeout_secs)
        key: String,

        /// Value to set
        value: String,

        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,

        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["gemplay-qa", "list", "--detailed"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.detailed);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_test_args() {
        let args = Args::parse_from([
            "gemplay-qa",
            "test",
            "--env",
            "staging",
            "--rounds",
            "10",
            "--parallel",
        ]);
        match args.command {
            Command::Test(test_args) => {
                assert_eq!(test_args.env, "staging");
                assert_eq!(test_args.rounds, 10);
                assert!(test_args.parallel);
            }
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    fn test_probe_args_defaults() {
        let args = Args::parse_from(["gemplay-qa", "probe"]);
        match args.command {
            Command::Probe(probe_args) => {
                assert_eq!(probe_args.interval, 10);
                assert_eq!(probe_args.samples, 6);
            }
            _ => panic!("Expected Probe command"),
        }
    }

    #[test]
    fn test_config_init_args() {
        let args = Args::parse_from(["gemplay-qa", "config", "init", "--force"]);
        match args.command {
            Command::Config(config_args) => match config_args.action {
                ConfigAction::Init { output, force } => {
                    assert_eq!(output, "./gemplay-qa.yaml");
                    assert!(force);
                }
                _ => panic!("Expected Init action"),
            },
            _ => panic!("Expected Config command"),
        }
    }
}
