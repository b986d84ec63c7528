//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use formwork_schemas::ValidationMode;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Formwork CLI - schema-driven form validation and rendering
///
/// Decode flat form submissions, validate them against a schema, render
/// forms from a UI schema, and summarise schemas as documentation.
#[derive(Parser, Debug)]
#[command(
    name = "formwork",
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
    #[arg(short, long, global = true, env = "FORMWORK_CONFIG")]
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
    /// Validate a submission against a schema
    Validate(ValidateArgs),

    /// Render a form from a UI schema, optionally pre-filled
    Render(RenderArgs),

    /// Decode flat form fields into nested data
    Decode(DecodeArgs),

    /// Summarise a schema's fields
    Describe(DescribeArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Where a submission comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SubmissionArgs {
    /// JSON file holding a flat object of field name to value (or list of values)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// A submitted field as name=value; may be repeated
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Schema file path, or a namespace/name identifier under the schemas directory
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: String,

    #[command(flatten)]
    pub submission: SubmissionArgs,

    /// Validation mode (defaults to the configured mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Seconds to wait for the schema to load
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Schema file path, or a namespace/name identifier under the schemas directory
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: String,

    /// UI schema file path, or a namespace/name identifier
    #[arg(short, long, value_name = "UI_SCHEMA")]
    pub ui: String,

    #[command(flatten)]
    pub submission: SubmissionArgs,

    /// Validate the submission and show its errors inline
    #[arg(long)]
    pub with_errors: bool,

    /// Rendered form format (defaults to the configured format)
    #[arg(long, value_enum)]
    pub format: Option<RenderFormat>,

    /// Write the rendered form to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the decode command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,
}

/// Arguments for the describe command
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Schema file path, or a namespace/name identifier under the schemas directory
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: String,

    /// Print a Markdown field table
    #[arg(long)]
    pub markdown: bool,
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

/// Validation depth
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Top-level properties only
    Shallow,
    /// Also array items and object members
    Deep,
}

/// Rendered form formats
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// HTML fragment
    #[default]
    Html,
    /// The view tree as JSON
    Json,
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

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Shallow => ValidationMode::Shallow,
            ModeArg::Deep => ValidationMode::Deep,
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

/// Split `name=value`; the value may itself contain `=` or be empty
fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing field name in '{}'", raw)),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
