//! CLI argument parsing for plume.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{ArgAction, Parser, Subcommand};

/// Plume: command-line composer for AI-generated LinkedIn-style posts.
///
/// Posts are generated through a configured chat-completion endpoint and
/// kept in a local store:
/// - the current post survives between invocations
/// - history-enabled profiles keep an ordered list of past posts
/// - profiles in config.yaml select which composer variant is active
#[derive(Parser, Debug)]
#[command(name = "plume")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for plume.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the local store and write the default configuration.
    ///
    /// Creates the data directory and a commented config.yaml with the
    /// built-in profiles. Other commands work without it, using defaults.
    Init,

    /// Generate a post from the given parameters.
    ///
    /// Builds the prompt, sends one generation request, prints the result,
    /// and stores it as the current post (and in the history, when the
    /// active profile keeps one).
    Generate(GenerateArgs),

    /// Print the current post.
    Show,

    /// Save the current post to the history.
    ///
    /// Explicitly prepends the current post, independent of the profile's
    /// automatic history behavior.
    Save,

    /// Copy the current post to the system clipboard.
    Copy,

    /// Open the share URL for the current post in the browser.
    Share,

    /// History management commands.
    ///
    /// List or clear the persisted post history.
    History(HistoryCommand),

    /// List configured profiles.
    ///
    /// Shows every profile from config.yaml with its capability set.
    Profiles,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Topic of the post. Required by topic-driven profiles.
    pub topic: Option<String>,

    /// Tone (inspirational, funny, professional, thought-provoking, casual).
    #[arg(short, long, default_value = "professional")]
    pub tone: String,

    /// Length (short, medium, long).
    #[arg(short, long, default_value = "medium")]
    pub length: String,

    /// Comma-separated buzzwords to weave into the post.
    #[arg(short, long)]
    pub buzzwords: Option<String>,

    /// Whether the post should end with hashtags.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub hashtags: bool,

    /// Scenario to narrate (scenario-driven profiles). When omitted, a
    /// random relatable situation is invented.
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Override the system instruction (profiles that allow it).
    #[arg(long)]
    pub system: Option<String>,

    /// Profile to use instead of the configured default.
    #[arg(short, long)]
    pub profile: Option<String>,
}

/// History subcommands.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub action: HistoryAction,
}

/// Available history actions.
#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List past posts, newest first.
    List,

    /// Empty the history.
    ///
    /// Requires --yes to prevent accidental clearing.
    Clear(HistoryClearArgs),
}

/// Arguments for the `history clear` command.
#[derive(Parser, Debug)]
pub struct HistoryClearArgs {
    /// Confirm clearing the history (required).
    #[arg(long)]
    pub yes: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
