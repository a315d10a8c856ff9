//! Command-line interface for xeno
//!
//! This module provides the main CLI structure and command dispatch. It uses
//! clap for argument parsing.

use crate::config::ConfigurationStore;
use crate::Result;
use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod output;

pub use output::Output;

/// xeno command-line tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file path
    Path,
    /// Show the configuration file contents
    Show,
    /// List every option as section.key = value
    List,
    /// Print a single value
    Get {
        /// Section name
        section: String,
        /// Option name
        key: String,
        /// Interpret the value as a boolean and print true or false
        #[arg(long = "bool")]
        as_bool: bool,
    },
    /// Set a value, creating the section if needed
    Set {
        /// Section name
        section: String,
        /// Option name
        key: String,
        /// New value
        value: String,
    },
    /// Remove a single option
    Unset {
        /// Section name
        section: String,
        /// Option name
        key: String,
    },
    /// Remove a section and all of its options
    RemoveSection {
        /// Section name
        section: String,
    },
}

impl Cli {
    /// Execute the CLI command
    ///
    /// The configuration store is created here and lent to whichever command
    /// needs it, so the file is read at most once per invocation.
    pub fn run(self, output: &Output) -> Result<()> {
        let mut store = ConfigurationStore::new();

        match self.command {
            Some(Commands::Config(cmd)) => commands::config::execute(cmd, &mut store, output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
