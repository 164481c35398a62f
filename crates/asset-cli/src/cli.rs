//! CLI argument parsing using clap derive

use std::path::PathBuf;

use asset_core::{DEFAULT_MARKER, TOKEN_ENV};
use asset_remote::DEFAULT_GITLAB_URL;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Asset pipeline - install skills, sync reference docs, validate markdown
#[derive(Parser, Debug)]
#[command(name = "asset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Link every unit found under a source tree into a target directory
    ///
    /// Examples:
    ///   asset install --source ./skills --target ~/.claude/skills
    ///   asset install --source ./plugins --target ./out --marker plugin.json --dry-run
    Install(InstallArgs),

    /// Pull reference documentation, at most once per cooldown window
    Sync(SyncArgs),

    /// Round-trip markdown through the GitLab renderer
    ///
    /// Reads the access token from GITLAB_TOKEN.
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Tree to scan for units
    #[arg(long)]
    pub source: PathBuf,

    /// Directory receiving one link per unit
    #[arg(long)]
    pub target: PathBuf,

    /// File whose presence makes a directory a unit
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Report what would change without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SyncArgs {
    /// Directory holding the manifest, lock record, and references
    #[arg(long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Ignore the cooldown
    #[arg(long)]
    pub force: bool,

    /// Compute the diff without writing files or the lock record
    #[arg(long)]
    pub dry_run: bool,

    /// Manifest path (defaults to <working-dir>/sync.toml)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Per-request timeout
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ValidateArgs {
    /// Markdown file to render
    #[arg(long, conflicts_with = "markdown", required_unless_present = "markdown")]
    pub file: Option<PathBuf>,

    /// Inline markdown to render
    #[arg(long)]
    pub markdown: Option<String>,

    /// Write the rendered HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project path used to resolve relative references (e.g. group/project)
    #[arg(long)]
    pub project: Option<String>,

    /// GitLab instance
    #[arg(long, env = "GITLAB_URL", default_value = DEFAULT_GITLAB_URL)]
    pub gitlab_url: String,

    /// Per-request timeout
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = TOKEN_ENV, hide = true, hide_env_values = true)]
    pub token: Option<String>,
}
