//! Clap derive structures for the `mediola` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mediola -- control shutters paired with a Mediola gateway
#[derive(Debug, Parser)]
#[command(
    name = "mediola",
    version,
    about = "Control WIR and Elero shutters through a Mediola gateway",
    long_about = "Control WIR and Elero shutters through a Mediola gateway.\n\n\
        Talks to the gateway's local HTTP command endpoint. Shutter states are\n\
        polled; commands are fire-and-forget followed by a fresh poll.",
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
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "MEDIOLA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway host or host:port (overrides profile)
    #[arg(long, short = 'H', env = "MEDIOLA_HOST", global = true)]
    pub host: Option<String>,

    /// Gateway user
    #[arg(long, short = 'u', env = "MEDIOLA_USERNAME", global = true)]
    pub username: Option<String>,

    /// Gateway password
    #[arg(long, env = "MEDIOLA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEDIOLA_OUTPUT",
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

    /// Polling interval in seconds (5-300)
    #[arg(long, env = "MEDIOLA_INTERVAL", global = true)]
    pub interval: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, env = "MEDIOLA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// List and move shutters
    #[command(alias = "s")]
    Shutters(ShuttersArgs),

    /// Poll the gateway and print every new snapshot until Ctrl-C
    Watch,

    /// Verify that the gateway is reachable with the configured credentials
    Check,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shutters ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShuttersArgs {
    #[command(subcommand)]
    pub command: ShuttersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShuttersCommand {
    /// List all shutters
    #[command(alias = "ls")]
    List,

    /// Show a single shutter
    Get {
        /// Shutter id (sid)
        sid: String,
    },

    /// Fully open a shutter
    Open {
        /// Shutter id (sid)
        sid: String,
    },

    /// Fully close a shutter
    Close {
        /// Shutter id (sid)
        sid: String,
    },

    /// Stop a moving shutter
    Stop {
        /// Shutter id (sid)
        sid: String,
    },

    /// Move a shutter to a position (0 = open, 100 = closed; WIR only)
    Position {
        /// Shutter id (sid)
        sid: String,

        /// Target position in percent
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Open every shutter
    OpenAll,

    /// Close every shutter
    CloseAll,

    /// Stop every shutter
    StopAll,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets redacted)
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a gateway password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
