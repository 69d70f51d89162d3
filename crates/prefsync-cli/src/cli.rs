use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "prefsync")]
#[command(about = "Save and sync job-search preferences from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the local pending-preference queue
    #[arg(long, global = true, value_name = "PATH")]
    pub store_dir: Option<PathBuf>,

    /// CLI profile name for backend configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Do not retry queued preferences before running the command
    #[arg(long, global = true)]
    pub no_startup_sync: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or update a preference
    #[command(alias = "add")]
    Save {
        /// Preference text, e.g. a saved job-search filter
        text: Vec<String>,
        /// Optional label
        #[arg(long)]
        name: Option<String>,
        /// Existing preference ID to update
        #[arg(long)]
        id: Option<String>,
        /// Owner of the preference (profile user when omitted)
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Metadata as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,
    },
    /// Delete a preference
    Delete {
        /// Preference ID
        id: String,
    },
    /// Search preferences
    Search {
        /// Search query
        query: String,
        /// Number of results to return
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
        /// Restrict results to one user
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List preferences
    List {
        /// Restrict results to one user
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Retry preferences queued while the backend was unavailable
    Sync,
    /// Show preferences waiting in the local queue
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Resume backend base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Default user ID for saves and queries
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
