use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use echo_nav_core::MergeStrategy;

#[derive(Parser)]
#[command(name = "echo-nav")]
#[command(about = "Personal bookmark navigator with GitHub Gist sync")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a website bookmark
    #[command(alias = "new")]
    Add {
        /// Display name
        name: String,
        /// Website URL (http:// or https://)
        url: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Category name (created when missing)
        #[arg(short, long)]
        category: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },
    /// List bookmarks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sync with the remote Gist (upload on first run, download afterwards)
    Sync {
        /// Resolve a detected conflict with this strategy
        #[arg(long, value_enum, value_name = "STRATEGY")]
        resolve: Option<ResolveStrategy>,
    },
    /// Upload local bookmarks to the remote Gist
    Push,
    /// Download bookmarks from the remote Gist
    Pull {
        /// Resolve a detected conflict with this strategy
        #[arg(long, value_enum, value_name = "STRATEGY")]
        resolve: Option<ResolveStrategy>,
    },
    /// Link this installation to an existing config Gist
    Link {
        /// Gist id
        gist_id: String,
    },
    /// Show sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent sync history
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Clear the history instead of showing it
        #[arg(long, conflicts_with_all = ["json", "limit"])]
        clear: bool,
    },
    /// Configure auto-sync for external schedulers
    AutoSync {
        /// Enable auto-sync
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Disable auto-sync
        #[arg(long)]
        disable: bool,
        /// Interval in minutes
        #[arg(long, value_name = "MINUTES")]
        interval: Option<u32>,
    },
    /// Manage the GitHub token for a profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
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
pub enum ResolveStrategy {
    Local,
    Remote,
    Merge,
}

impl From<ResolveStrategy> for MergeStrategy {
    fn from(value: ResolveStrategy) -> Self {
        match value {
            ResolveStrategy::Local => Self::Local,
            ResolveStrategy::Remote => Self::Remote,
            ResolveStrategy::Merge => Self::Merge,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a GitHub personal access token (gist scope) in the keychain
    Login {
        /// GitHub personal access token
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Show whether a token is available
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Local data directory for this profile
        #[arg(long, value_name = "PATH")]
        data_dir: Option<String>,
        /// GitHub API base URL (GitHub Enterprise)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile configuration
    Show,
}
