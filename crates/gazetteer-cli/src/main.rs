//! Gazetteer CLI
//!
//! Batch entrypoints for the two hierarchy phases plus a config linter:
//! - `build-parents`: resolve placetype + per-dimension parents, write the
//!   `parents.json` checkpoint
//! - `build-hierarchy`: walk the checkpoint into ancestor paths/trees
//! - `check-config`: parse and validate an entity mapping config
//!
//! Storage here is the file-backed snapshot store; the engine itself only
//! talks to the store traits.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gazetteer_hierarchy::{Dimension, HierarchyConfig, HierarchyWalker, ParentResolver};
use gazetteer_store::{persistence, MemoryStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gazetteer")]
#[command(
    author,
    version,
    about = "Gazetteer: place hierarchy resolution and traversal"
)]
struct Cli {
    /// Enable chatty logging; default is false
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve placetypes and per-dimension parents for every unresolved
    /// place, writing results back to the store snapshot and to a
    /// `parents.json` checkpoint.
    BuildParents {
        /// Input config JSON file path
        #[arg(short, long, default_value = "./etc/config.json")]
        config: PathBuf,
        /// Store snapshot JSON (read and updated in place)
        #[arg(short, long)]
        store: PathBuf,
        /// Output parent checkpoint JSON file path
        #[arg(short, long, default_value = "parents.json")]
        parents: PathBuf,
    },

    /// Walk resolved parent chains into ancestor paths and metadata trees,
    /// writing results back to the store snapshot and a hierarchy dump.
    BuildHierarchy {
        /// Input config JSON file path
        #[arg(short, long, default_value = "./etc/config.json")]
        config: PathBuf,
        /// Store snapshot JSON (read and updated in place)
        #[arg(short, long)]
        store: PathBuf,
        /// Input parent checkpoint JSON file path
        #[arg(short, long, default_value = "parents.json")]
        parents: PathBuf,
        /// Output hierarchy JSON file path
        #[arg(short, long, default_value = "hierarchy.json")]
        output: PathBuf,
    },

    /// Parse and validate a config file, printing a mapping summary.
    CheckConfig {
        /// Input config JSON file path
        #[arg(short, long, default_value = "./etc/config.json")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::BuildParents {
            config,
            store,
            parents,
        } => cmd_build_parents(&config, &store, &parents),
        Commands::BuildHierarchy {
            config,
            store,
            parents,
            output,
        } => cmd_build_hierarchy(&config, &store, &parents, &output),
        Commands::CheckConfig { config } => cmd_check_config(&config),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_build_parents(config: &PathBuf, store_path: &PathBuf, parents: &PathBuf) -> Result<()> {
    // Malformed config is fatal before any store access.
    let config = HierarchyConfig::from_path(config)?;
    let snapshot = persistence::load_snapshot(store_path)?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    let run = ParentResolver::new(&mut store, &config).build()?;

    persistence::save_snapshot(store_path, &store.to_snapshot())?;
    persistence::write_checkpoint(parents, &run)?;

    let unresolved: usize = run
        .values()
        .map(|p| {
            Dimension::ALL
                .iter()
                .filter(|&&dim| p.parent(dim).is_none())
                .count()
        })
        .sum();
    println!(
        "{} resolved {} places ({} dimension gaps) -> {}",
        "ok:".green().bold(),
        run.len(),
        unresolved,
        parents.display()
    );
    Ok(())
}

fn cmd_build_hierarchy(
    config: &PathBuf,
    store_path: &PathBuf,
    parents: &PathBuf,
    output: &PathBuf,
) -> Result<()> {
    // Loaded for the same startup validation as build-parents; traversal
    // itself only needs the checkpoint.
    let _config = HierarchyConfig::from_path(config)?;
    let snapshot = persistence::load_snapshot(store_path)?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    let run = persistence::read_checkpoint(parents)?;
    let mut walker = HierarchyWalker::new(&mut store, run.into_values())?;
    let hierarchy = walker.build()?;

    persistence::save_snapshot(store_path, &store.to_snapshot())?;
    tracing::info!(count = hierarchy.len(), path = %output.display(), "serialising places");
    persistence::write_checkpoint(output, &hierarchy)?;

    println!(
        "{} walked {} places -> {}",
        "ok:".green().bold(),
        hierarchy.len(),
        output.display()
    );
    Ok(())
}

fn cmd_check_config(config: &PathBuf) -> Result<()> {
    let config = HierarchyConfig::from_path(config)?;

    println!("{}", "config ok".green().bold());
    println!("  mappings:  {}", config.mappings.len());
    println!("  countries: {}", config.countries.len());
    println!("  overrides: {}", config.overrides.len());
    println!("  sanitise:  {}", config.sanitise.len());

    for (entity, mapping) in &config.mappings {
        let dims: Vec<String> = mapping
            .parents
            .iter()
            .map(|(dim, candidates)| format!("{dim}({})", candidates.len()))
            .collect();
        let root = if config.is_country(entity) {
            " [root]".to_string()
        } else {
            String::new()
        };
        println!(
            "  {} -> {}{} {}",
            entity.bold(),
            mapping.placetype,
            root,
            dims.join(" ")
        );
    }
    Ok(())
}
