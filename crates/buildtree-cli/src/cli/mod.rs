//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "buildtree",
    bin_name = "buildtree",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Platform build trees for your apps, from a template",
    long_about = "buildtree materializes a platform-specific bundle for each app \
                  in a project: it renders the platform template, installs the \
                  support package, stub binary, app code, requirements and \
                  resources, then cleans up.",
    after_help = "EXAMPLES:\n\
        \x20 buildtree create linux system\n\
        \x20 buildtree create macos app --app first\n\
        \x20 buildtree list\n\
        \x20 buildtree completions bash > /usr/share/bash-completion/completions/buildtree",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the build tree for one or more apps.
    #[command(
        visible_alias = "c",
        about = "Create app bundles for a platform and output format",
        after_help = "EXAMPLES:\n\
            \x20 buildtree create linux system\n\
            \x20 buildtree create windows app --app first --no-input\n\
            \x20 buildtree create macos app --project ../hello"
    )]
    Create(CreateArgs),

    /// List the apps defined by a project.
    #[command(
        visible_alias = "ls",
        about = "List the project's apps",
        after_help = "EXAMPLES:\n\
            \x20 buildtree list\n\
            \x20 buildtree list --format json\n\
            \x20 buildtree list --project ../hello"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 buildtree completions bash > ~/.local/share/bash-completion/completions/buildtree\n\
            \x20 buildtree completions zsh  > ~/.zfunc/_buildtree\n\
            \x20 buildtree completions fish > ~/.config/fish/completions/buildtree.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the buildtree settings.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 buildtree config list\n\
            \x20 buildtree config path"
    )]
    Config(ConfigCommands),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `buildtree create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Target platform, e.g. `linux`, `macos`, `windows`.
    #[arg(value_name = "PLATFORM", help = "Target platform")]
    pub platform: String,

    /// Output format for the platform, e.g. `system`, `app`, `flatpak`.
    #[arg(value_name = "FORMAT", help = "Output format")]
    pub format: String,

    /// Only create this app (default: every app in the project).
    #[arg(
        short = 'a',
        long = "app",
        value_name = "APP",
        help = "Create a single app"
    )]
    pub app: Option<String>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `buildtree list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format for the listing.
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for `buildtree list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One app name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `buildtree completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `buildtree config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved settings.
    List,
    /// Print the path of the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
