//! Command-line front end for the edition registries.
//!
//! Configuration is loaded from `quarry.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p quarry-tool -- lookup --edition alpha 35:14` to
//! inspect a block, or `-- convert --from classic --to alpha 21 30` to convert
//! identifiers between editions.

use clap::{Parser, Subcommand};
use quarry_config::{CliArgs, Config, parse_identifier};
use quarry_materials::{
    BlockDescriptor, ConversionError, Edition, EditionError, Editions, Identifier, NamedBlocks,
    RegistryError, resolve_correspondence,
};
use thiserror::Error;
use tracing::info;

#[derive(Parser)]
#[command(name = "quarry", about = "Inspect block palettes and convert ids between editions")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every attribute of one block
    Lookup {
        #[arg(long, short)]
        edition: Edition,
        /// `primary[:variant]`, or an exact display name
        block: String,
    },
    /// List known blocks whose name contains every word of the query
    Search {
        #[arg(long, short)]
        edition: Edition,
        query: String,
    },
    /// Convert identifiers from one edition's numbering to another's
    Convert {
        #[arg(long)]
        from: Edition,
        #[arg(long)]
        to: Edition,
        /// `primary[:variant]` values
        #[arg(value_parser = parse_identifier, required = true)]
        ids: Vec<(u16, u8)>,
    },
    /// Print how every known block of one edition maps onto another
    Report {
        #[arg(long)]
        from: Edition,
        #[arg(long)]
        to: Edition,
    },
    /// Print the generated constant-name table of an edition
    Constants {
        #[arg(long, short)]
        edition: Edition,
    },
}

#[derive(Debug, Error)]
enum ToolError {
    #[error(transparent)]
    Edition(#[from] EditionError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

fn describe(block: &BlockDescriptor<'_>) {
    println!("{block}");
    let aka = block.aka();
    if !aka.is_empty() {
        println!("  aka:        {aka}");
    }
    println!("  category:   {}", block.category());
    println!("  emission:   {}", block.light_emission());
    println!("  absorption: {}", block.light_absorption());
    println!("  color:      {:?}", block.color());
    println!("  texture:    {:?}", block.texture());
    let string_id = block.string_id();
    if !string_id.is_empty() {
        println!("  string id:  {string_id}");
    }
    if !block.is_known() {
        println!("  (not defined in {})", block.registry().label());
    }
}

fn run(command: Command, editions: &Editions) -> Result<(), ToolError> {
    match command {
        Command::Lookup { edition, block } => {
            let registry = editions.get(edition);
            let block = match parse_identifier(&block) {
                Ok((primary, variant)) => registry.lookup_by_identifier(primary, variant)?,
                Err(_) => registry.lookup_by_name(&block)?,
            };
            describe(&block);
        }
        Command::Search { edition, query } => {
            let matches = editions.get(edition).lookup_by_partial_name(&query);
            if matches.is_empty() {
                println!("no {edition} block matches {query:?}");
            }
            for block in matches {
                println!("{block}");
            }
        }
        Command::Convert { from, to, ids } => {
            let (primaries, variants): (Vec<u16>, Vec<u8>) = ids.into_iter().unzip();
            let (out_primaries, out_variants) =
                editions.convert_blocks(to, from, &primaries, Some(&variants))?;
            let source = editions.get(from);
            let destination = editions.get(to);
            for (i, (&primary, &variant)) in out_primaries.iter().zip(&out_variants).enumerate() {
                let before = source.descriptor(Identifier::new(primaries[i], variants[i])?);
                let after = destination.descriptor(Identifier::new(primary, variant)?);
                println!("{before} -> {after}");
            }
        }
        Command::Report { from, to } => {
            let source = editions.get(from);
            let destination = editions.get(to);
            let correspondence = resolve_correspondence(source, destination);
            for filter in &correspondence.filters {
                println!(
                    "{} -> {} [{:?}]",
                    source.descriptor(filter.source),
                    destination.descriptor(filter.destination),
                    filter.rule
                );
            }
            for &id in &correspondence.unavailable {
                println!("{} -> fallback {}", source.descriptor(id), editions.cache().fallback());
            }
            info!(
                source = %from,
                destination = %to,
                remapped = correspondence.filters.len(),
                unavailable = correspondence.unavailable.len(),
                "correspondence report"
            );
        }
        Command::Constants { edition } => {
            let registry = editions.get(edition);
            for (key, id) in NamedBlocks::from_registry(registry).iter() {
                println!("{key} = {id}");
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Resolve config directory
    let config_dir = cli.args.config.clone().or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&cli.args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    quarry_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    let editions = match Editions::from_config(&config) {
        Ok(editions) => editions,
        Err(e) => {
            eprintln!("Failed to load editions: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &editions) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
