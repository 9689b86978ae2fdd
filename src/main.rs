use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use image::DynamicImage;
use tracing_subscriber::EnvFilter;

use lib::assemble::fingerprint_card;
use lib::config::{Config, ALL_SET_CARDS, ALL_ST_CARDS};
use lib::{build, Fingerprint, FingerprintTable, HashVariant, HttpFetcher};

#[derive(Parser, Debug)]
#[command(name = "card-fingerprint", version, about = "Card artwork fingerprint table builder")]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = Variant::Gradient)]
    variant: Variant,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the catalog and write the fingerprint table
    Build {
        #[arg(long = "source", default_values_t = [ALL_SET_CARDS.to_string(), ALL_ST_CARDS.to_string()])]
        sources: Vec<String>,
        #[arg(long, short, default_value = "hashes.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,
    },
    /// Print the fingerprint of a local card image
    Hash {
        image: PathBuf,
        #[arg(long, default_value_t = false, help = "Hash the whole image instead of the artwork")]
        no_crop: bool,
    },
    /// Show the closest entries of a table for a local card image
    Match {
        table: PathBuf,
        image: PathBuf,
        #[arg(short, default_value_t = 5)]
        k: usize,
        #[arg(long, help = "Only show entries at most this many bits away")]
        max_distance: Option<u32>,
        #[arg(long, default_value_t = false)]
        no_crop: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    Average,
    Gradient,
}

impl From<Variant> for HashVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Average => HashVariant::Average,
            Variant::Gradient => HashVariant::Gradient,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let variant = HashVariant::from(cli.variant);

    match cli.command {
        Commands::Build {
            sources,
            output,
            timeout_secs,
            delay_ms,
        } => {
            let config = Config {
                sources,
                output,
                timeout: Duration::from_secs(timeout_secs),
                delay: Duration::from_millis(delay_ms),
                variant,
                ..Config::default()
            };
            let fetcher = HttpFetcher::from_config(&config)?;
            let report = build(&config, &fetcher)?;
            println!(
                "Wrote {} with {} entries ({})",
                config.output.display(),
                report.committed,
                report
            );
        }
        Commands::Hash { image, no_crop } => {
            println!("{}", hash_file(&image, variant, no_crop)?);
        }
        Commands::Match {
            table,
            image,
            k,
            max_distance,
            no_crop,
        } => {
            let store = FingerprintTable::from_file(&table)
                .with_context(|| format!("failed to read table {}", table.display()))?;
            let query = hash_file(&image, variant, no_crop)?;
            println!("query {}", query);
            let found = match max_distance {
                Some(max) => store.find_within(&query, k, max),
                None => store.find_many(&query, k),
            };
            if found.is_empty() {
                println!("no match");
            }
            for (entry, distance) in found {
                println!("{}\t{}\td={}", entry.id, entry.hash, distance);
            }
        }
    }
    Ok(())
}

fn hash_file(path: &Path, variant: HashVariant, no_crop: bool) -> Result<Fingerprint> {
    let card = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?;
    let card = DynamicImage::ImageRgb8(card.to_rgb8());
    let hash = if no_crop {
        variant.hash(&card)
    } else {
        fingerprint_card(&card, variant)
    };
    hash.with_context(|| format!("failed to hash {}", path.display()))
}
