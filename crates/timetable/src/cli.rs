//! Clap derive structures for the `timetable` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use timetable_config::TokenStoreKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// timetable -- manage staff schedules from the command line
#[derive(Debug, Parser)]
#[command(
    name = "timetable",
    version,
    about = "Manage staff schedules from the command line",
    long_about = "Lists, creates, updates and deletes staff members and their weekly\n\
        schedules against the staff timetable API.\n\n\
        Authentication is delegated to the main system: store the token it\n\
        issued with `timetable token set`.",
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
    /// Environment: localhost, development or production
    #[arg(long, short = 'm', env = "TIMETABLE_MODE", global = true)]
    pub mode: Option<String>,

    /// Origin the app is served from (required for development/production)
    #[arg(long, env = "TIMETABLE_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TIMETABLE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
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
    /// Manage staff members
    #[command(alias = "s")]
    Staff(StaffArgs),

    /// Inspect weekly schedules
    #[command(alias = "sch")]
    Schedule(ScheduleArgs),

    /// Manage the stored session token
    Token(TokenArgs),

    /// Inspect or write the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Staff ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StaffArgs {
    #[command(subcommand)]
    pub command: StaffCommand,
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// List staff members
    #[command(alias = "ls")]
    List {
        /// Only active (true) or inactive (false) members
        #[arg(long)]
        active: Option<bool>,
    },

    /// Show one staff member
    Get {
        /// Staff member ID
        id: String,
    },

    /// Create a staff member
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        schedule: ScheduleInput,
    },

    /// Replace a staff member's name, email and schedule
    Update {
        /// Staff member ID
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        schedule: ScheduleInput,
    },

    /// Delete a staff member
    #[command(alias = "rm")]
    Delete {
        /// Staff member ID
        id: String,
    },
}

/// Where a weekly schedule comes from, if given.
#[derive(Debug, Args)]
pub struct ScheduleInput {
    /// Schedule as JSON, e.g. '{"monday":[{"start":"09:00","end":"17:00"}]}'
    #[arg(long, conflicts_with = "schedule_file")]
    pub schedule: Option<String>,

    /// Read the schedule JSON from a file
    #[arg(long, value_name = "PATH")]
    pub schedule_file: Option<PathBuf>,
}

// ── Schedule ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Show a staff member's weekly schedule, one row per day
    Show {
        /// Staff member ID
        id: String,
    },

    /// Print the canonical empty schedule
    Empty,
}

// ── Token ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a session token (prompted if omitted)
    Set {
        /// Bearer token issued by the main system
        token: Option<String>,
    },

    /// Remove the stored token
    Clear,

    /// Report whether a token is stored
    Status,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Write the settings file from --mode/--origin
    Init {
        /// Token backend: file, keyring or memory
        #[arg(long)]
        token_store: Option<TokenStoreKind>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
