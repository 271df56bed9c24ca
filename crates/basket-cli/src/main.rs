mod compare;
mod normalize;

use std::path::{Path, PathBuf};

use anyhow::Context;
use basket_core::AppConfig;
use basket_normalize::Normalizer;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "basket")]
#[command(about = "Grocery product normalization and price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the normalized form and extracted sizes of product names
    Normalize {
        /// Raw retailer titles
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the sizes found in a piece of text
    Sizes {
        /// Free text, e.g. "Heinz Beanz 4 x 415g"
        text: String,
    },
    /// Normalize a JSON array of scraped products
    NormalizeProducts {
        /// JSON file of `{name, price, url, image_url}` records
        #[arg(long)]
        input: PathBuf,
    },
    /// Price a shopping list at every retailer in a catalog
    Compare {
        /// JSON file of catalog rows
        #[arg(long)]
        catalog: PathBuf,
        /// JSON file of `{name, quantity}` shopping-list items
        #[arg(long)]
        list: PathBuf,
    },
    /// Compare configured popular items like-for-like across retailers
    Popular {
        /// JSON file of catalog rows
        #[arg(long)]
        catalog: PathBuf,
        /// Popular items YAML (defaults to BASKET_POPULAR_ITEMS_PATH or the built-in list)
        #[arg(long)]
        items: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = basket_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let normalizer = build_normalizer(&config)?;

    match cli.command {
        Commands::Normalize { names } => normalize::run_normalize(&normalizer, &names),
        Commands::Sizes { text } => normalize::run_sizes(&text),
        Commands::NormalizeProducts { input } => {
            normalize::run_normalize_products(&normalizer, &input)
        }
        Commands::Compare { catalog, list } => {
            compare::run_compare(&config, &normalizer, &catalog, &list)
        }
        Commands::Popular { catalog, items } => {
            compare::run_popular(&config, &normalizer, &catalog, items.as_deref())
        }
    }
}

/// Uses the rule file from `BASKET_RULES_PATH` when set, the built-in tables otherwise.
fn build_normalizer(config: &AppConfig) -> anyhow::Result<Normalizer> {
    match &config.rules_path {
        Some(path) => {
            let rules = basket_core::load_rules(path)?;
            tracing::info!(path = %path.display(), "loaded normalization rules");
            Normalizer::new(&rules)
                .with_context(|| format!("failed to compile rules from {}", path.display()))
        }
        None => Normalizer::with_builtin_rules().context("failed to compile built-in rules"),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
