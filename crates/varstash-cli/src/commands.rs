use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;
use varstash_sdk::{JsonCodec, Stash, StashConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let stash = Stash::open(config, JsonCodec)?;
    debug!(root = ?stash.root(), "store opened");

    match cli.command {
        Command::Save(args) => cmd_save(&stash, args),
        Command::Ls(_) => cmd_ls(&stash),
        Command::Load(args) => cmd_load(&stash, args),
        Command::Check(_) => cmd_check(&stash),
        Command::Restore(args) => cmd_restore(&stash, args),
    }
}

/// Config file first, then flag overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<StashConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StashConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store_name = store.clone();
    }
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    Ok(config)
}

fn parse_entry_arg(arg: &str) -> anyhow::Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((name, file)) if !name.is_empty() && !file.is_empty() => {
            Ok((name.to_string(), PathBuf::from(file)))
        }
        _ => bail!("expected NAME=FILE.json, got {arg:?}"),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn cmd_save(stash: &Stash<JsonCodec>, args: SaveArgs) -> anyhow::Result<()> {
    let mut entries = Vec::with_capacity(args.entries.len());
    for arg in &args.entries {
        let (name, path) = parse_entry_arg(arg)?;
        entries.push((name, read_json(&path)?));
    }

    let report = stash.save_entries(entries.iter().map(|(name, value)| (name.as_str(), value)))?;

    for name in &report.inserted {
        println!("  {} {}", "added:".green(), name);
    }
    for name in &report.updated {
        println!("  {} {}", "updated:".yellow(), name);
    }
    for name in &report.deleted {
        println!("  {} {}", "trashed:".red(), name);
    }
    for failure in report.skipped.iter().chain(&report.drift) {
        println!("  {} {}", "skipped:".red().bold(), failure);
    }
    println!(
        "{} {} written, {} unchanged, {} trashed",
        "✓".green().bold(),
        report.blob_writes(),
        report.unchanged.len(),
        report.deleted.len()
    );
    Ok(())
}

fn cmd_ls(stash: &Stash<JsonCodec>) -> anyhow::Result<()> {
    let entries = stash.entries()?;
    if entries.is_empty() {
        println!("Store is empty.");
        return Ok(());
    }
    for (name, digest) in entries.iter() {
        println!("{}  {}", digest.short_hex().dimmed(), name);
    }
    Ok(())
}

fn cmd_load(stash: &Stash<JsonCodec>, args: LoadArgs) -> anyhow::Result<()> {
    let (values, report) = stash.load_map()?;

    match &args.out {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            for (ident, value) in &values {
                let path = dir.join(format!("{ident}.json"));
                let text = serde_json::to_string_pretty(value)?;
                fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
                println!("  {} {}", "wrote:".green(), path.display());
            }
        }
        None => {
            for (ident, value) in &values {
                println!("{} = {}", ident.bold(), value);
            }
        }
    }

    for failure in &report.failures {
        eprintln!("  {} {}", "failed:".red().bold(), failure);
    }
    Ok(())
}

fn cmd_check(stash: &Stash<JsonCodec>) -> anyhow::Result<()> {
    let drift = stash.check()?;
    if drift.is_consistent() {
        println!("{} Metadata and blobs agree.", "✓".green().bold());
        return Ok(());
    }
    for name in &drift.orphaned_blobs {
        println!("  {} {}", "orphaned blob:".yellow(), name);
    }
    for name in &drift.missing_blobs {
        println!("  {} {}", "missing blob:".red(), name);
    }
    bail!(
        "{} orphaned, {} missing",
        drift.orphaned_blobs.len(),
        drift.missing_blobs.len()
    )
}

fn cmd_restore(stash: &Stash<JsonCodec>, args: RestoreArgs) -> anyhow::Result<()> {
    stash.restore(&args.name)?;
    println!("{} Restored {}", "✓".green().bold(), args.name.yellow());
    println!("  Run {} to record it again.", "varstash save".bold());
    Ok(())
}
