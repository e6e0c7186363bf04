//! Clap derive structures for the `mealdeck` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mealdeck -- browse and manage a food listing menu
#[derive(Debug, Parser)]
#[command(
    name = "mealdeck",
    version,
    about = "Browse and manage a food listing menu from the command line",
    long_about = "A command-line storefront for a food listing REST API.\n\n\
        List, search, and filter meals, and add, edit, or delete listings.\n\
        Reads are cached per invocation; writes refresh the affected listings.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Food API base URL (overrides config and environment)
    #[arg(long, short = 'u', global = true)]
    pub base_url: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "MEALDECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "MEALDECK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MEALDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse, search, and manage meals
    #[command(alias = "meal", alias = "m")]
    Meals(MealsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEALS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MealsArgs {
    #[command(subcommand)]
    pub command: MealsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MealsCommand {
    /// List every meal on the menu
    #[command(alias = "ls")]
    List,

    /// Show one meal
    Get {
        /// Meal ID
        id: String,
    },

    /// Search meals by name (a blank term lists every meal)
    #[command(alias = "find")]
    Search {
        /// Name to search for
        #[arg(default_value = "")]
        term: String,
    },

    /// List meals matching query filters
    Filter(FilterArgs),

    /// Add a meal to the menu
    Add(MealFormArgs),

    /// Edit an existing meal (unset fields keep their current value)
    Edit {
        /// Meal ID
        id: String,

        #[command(flatten)]
        form: MealFormArgs,
    },

    /// Remove a meal from the menu
    #[command(alias = "rm")]
    Delete {
        /// Meal ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Match on meal name
    #[arg(long)]
    pub name: Option<String>,

    /// Match on rating
    #[arg(long)]
    pub rating: Option<String>,

    /// Match on restaurant status (true = open)
    #[arg(long)]
    pub open: Option<bool>,

    /// Match on price
    #[arg(long)]
    pub price: Option<String>,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", short = 'P', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Only query when at least one filter is set
    #[arg(long)]
    pub advanced: bool,
}

#[derive(Debug, Args)]
pub struct MealFormArgs {
    /// Food name
    #[arg(long)]
    pub name: Option<String>,

    /// Food rating (free text)
    #[arg(long)]
    pub rating: Option<String>,

    /// Food image URL
    #[arg(long, alias = "image")]
    pub avatar: Option<String>,

    /// Restaurant name
    #[arg(long)]
    pub restaurant_name: Option<String>,

    /// Restaurant logo URL
    #[arg(long)]
    pub logo: Option<String>,

    /// Restaurant status: open or closed
    #[arg(long)]
    pub status: Option<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_owned(), v.to_owned()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "api.base_url")
        key: String,

        /// Value to set
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
