use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use italia_geo::config::{DataSource, DATA_ENV, DEFAULT_HOST, DEFAULT_PORT};
use italia_geo::geo::{match_municipality, normalize_municipality, GeoRegistry, ProvinceRecord};
use italia_geo::{logging, server};
use serde::Serialize;
use std::path::PathBuf;

/// italia-geo — Italian province and comune resolution
///
/// Canonicalises free-text province references to their official code,
/// compares comune names, and serves the same queries over HTTP.
///
/// Examples:
///   italia-geo province "Provincia di Milano"
///   italia-geo match "S. Giovanni Valdarno" "San Giovanni Valdarno"
///   italia-geo region Lombardia
///   italia-geo search bre
///   italia-geo serve --port 3080
#[derive(Parser)]
#[command(name = "italia-geo", version, about, long_about = None)]
struct Cli {
    /// Alternate province dataset (JSON array of province records).
    #[arg(long, global = true, env = DATA_ENV)]
    data: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a province name, seat, alias or code.
    Province { text: String },
    /// Show the normalised form of a comune name.
    Normalize { name: String },
    /// Test whether two comune names are equivalent.
    Match { a: String, b: String },
    /// List the provinces of a region.
    Region { name: String },
    /// Autocomplete provinces (at most 10 results).
    Search { query: String },
    /// List every province.
    List,
    /// Serve the HTTP API.
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let source = DataSource::select(cli.data);
    let registry = source
        .load()
        .with_context(|| format!("loading provinces from {}", source))?;

    match cli.command {
        Command::Province { text } => {
            let Some(record) = registry.resolve_province(&text) else {
                bail!("Province not found: '{}'", text);
            };
            print_json(record)
        }
        Command::Normalize { name } => {
            let normalized = normalize_municipality(&name);
            print_json(&serde_json::json!({ "input": name, "normalized": normalized }))
        }
        Command::Match { a, b } => {
            let matched = match_municipality(&a, &b);
            print_json(&serde_json::json!({ "a": a, "b": b, "matched": matched }))
        }
        Command::Region { name } => {
            let provinces = registry.find_provinces_in_region(&name);
            if provinces.is_empty() {
                bail!("No provinces for region '{}'. Known regions: {}", name, registry.regions().join(", "));
            }
            print_json(&provinces)
        }
        Command::Search { query } => print_json(&registry.search_provinces(&query)),
        Command::List => {
            for rec in registry.provinces() {
                eprintln!("  {}", rec.label());
            }
            print_json(&summaries(registry.provinces()))
        }
        Command::Serve { host, port } => {
            let registry: GeoRegistry = registry.into_owned();
            let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
            runtime
                .block_on(server::start(&host, port, registry))
                .with_context(|| format!("serving on {}:{}", host, port))
        }
    }
}

fn summaries(records: &[ProvinceRecord]) -> Vec<italia_geo::geo::ProvinceSummary> {
    records.iter().map(ProvinceRecord::summary).collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
