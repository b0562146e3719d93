// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the service (default)
//! - `validate`: Validate configuration file
//! - `version`: Show version information
//! - `gen-secret`: Generate a token signing secret
//! - `hash-password`: Hash a password the way stored records expect

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Tessera command line.
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    author = "Sylvex <contact@sylvex.io>",
    version = tessera_core::VERSION,
    about = "User account and session token service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(
        short,
        long,
        default_value = "tessera.yaml",
        env = "TESSERA_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level. Falls back to `logging.level` from the configuration.
    #[arg(short, long, env = "TESSERA_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format. Falls back to `logging.format` from the configuration.
    #[arg(long, env = "TESSERA_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand; `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP service.
    Run(RunArgs),

    /// Load and validate the configuration file.
    Validate(ValidateArgs),

    /// Show version information.
    Version,

    /// Generate a random token signing secret.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),

    /// Hash a password into a PHC string.
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for `run`.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the listen port.
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for `validate`.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Print the parsed configuration (secrets redacted).
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `gen-secret`.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Number of random bytes.
    #[arg(short, long, default_value_t = 48)]
    pub bytes: usize,

    /// Write the secret to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `hash-password`.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash.
    #[arg(required_unless_present = "stdin")]
    pub value: Option<String>,

    /// Read the password from stdin.
    #[arg(long)]
    pub stdin: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Single-line compact text.
    Compact,
}

impl From<LogFormat> for tessera_config::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => tessera_config::LogFormat::Text,
            LogFormat::Json => tessera_config::LogFormat::Json,
            LogFormat::Compact => tessera_config::LogFormat::Compact,
        }
    }
}

/// Command output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON.
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parses process arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the subcommand, defaulting to `run`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Returns `true` if verbose output is requested and not silenced.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Resolves the log level: `--quiet`, `--verbose`, `--log-level`, then
    /// the configured level.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Resolves the log format against the configured one.
    pub fn effective_log_format(
        &self,
        configured: tessera_config::LogFormat,
    ) -> tessera_config::LogFormat {
        self.log_format.map(Into::into).unwrap_or(configured)
    }
}

impl Default for GenSecretArgs {
    fn default() -> Self {
        Self {
            bytes: 48,
            output: None,
        }
    }
}
