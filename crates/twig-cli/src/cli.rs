use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "twig",
    about = "Twig -- structural diffs for ordered trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two JSON documents as trees
    Tree(TreeArgs),
    /// Diff two strings as sequences
    Seq(SeqArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    /// The document to diff from
    pub old: PathBuf,
    /// The document to diff to
    pub new: PathBuf,
    /// Adapter config (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Field holding node ids
    #[arg(long)]
    pub id_field: Option<String>,
    /// Field holding child arrays
    #[arg(long)]
    pub children_field: Option<String>,
    /// Report relocations as remove + add
    #[arg(long)]
    pub no_moves: bool,
    /// Also print the edit tree
    #[arg(long)]
    pub show_tree: bool,
}

#[derive(Args)]
pub struct SeqArgs {
    pub old: String,
    pub new: String,
    /// Split on this separator instead of per character
    #[arg(long)]
    pub split: Option<String>,
}
