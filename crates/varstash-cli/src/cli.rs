use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "varstash",
    about = "Persist named JSON values to a directory, incrementally",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory name, overrides the config file
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Directory the store lives in, overrides the config file
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Make the store hold exactly the given entries
    Save(SaveArgs),
    /// List stored entries
    Ls(LsArgs),
    /// Load every stored entry
    Load(LoadArgs),
    /// Compare metadata with the blobs on disk
    Check(CheckArgs),
    /// Bring back the newest trashed blob of an entry
    Restore(RestoreArgs),
}

#[derive(Args)]
pub struct SaveArgs {
    /// NAME=FILE.json pairs
    pub entries: Vec<String>,
}

#[derive(Args)]
pub struct LsArgs {}

#[derive(Args)]
pub struct LoadArgs {
    /// Write `<identifier>.json` files here instead of printing
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct RestoreArgs {
    pub name: String,
}
