//! Retrieval chunking service.
//!
//! Backfills 6-hour assimilation chunks for one retrieval product over
//! a date range: locates daily intermediate files, translates them into
//! the common sounding schema, splits each day into 3-hour fragments,
//! and pastes adjacent fragments into 6-hour chunks.

mod sources;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use chunking::{ChunkConfig, ChunkDriver, TranslatorRegistry};
use obs_common::ProductId;
use sources::SourceOverrides;

#[derive(Parser, Debug)]
#[command(name = "chunker")]
#[command(about = "Chunk satellite retrieval soundings for assimilation")]
struct Args {
    /// Product to build, as source_variable_satellite_version
    name: String,

    /// Begin date (YYYY-MM-DD)
    #[arg(long, default_value = "1980-01-01")]
    beg: String,

    /// End date (YYYY-MM-DD; default: today)
    #[arg(long)]
    end: Option<String>,

    /// Reprocess/overwrite outputs that already exist
    #[arg(long)]
    repro: bool,

    /// Head data directory
    #[arg(long, default_value = "./data")]
    head: PathBuf,

    /// Per-source overrides file (YAML)
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Attribution recorded in chunk contact attributes
    #[arg(long)]
    contact: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let product: ProductId = args.name.parse()?;
    let beg = NaiveDate::parse_from_str(&args.beg, "%Y-%m-%d")?;
    let end = match &args.end {
        Some(end) => NaiveDate::parse_from_str(end, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };
    if end < beg {
        bail!("begin date ({beg}) is later than end date ({end})");
    }

    let overrides = match &args.sources {
        Some(path) => SourceOverrides::load(path)?,
        None => SourceOverrides::default(),
    };
    let src = overrides.get(&product.source);

    let mut cfg = ChunkConfig::for_product(product.clone(), &args.head);
    cfg.reprocess = args.repro;
    cfg.contact = args.contact.clone();
    sources::apply(&mut cfg, &src);

    // Per-source translators register here as they are ported; anything
    // unregistered must already be in the common schema.
    let registry = TranslatorRegistry::new();
    let translator_name = src.translator.clone().unwrap_or_else(|| {
        if registry.get(&product.source).is_some() {
            product.source.clone()
        } else {
            "default".to_string()
        }
    });
    let translator = registry.get(&translator_name).ok_or_else(|| {
        anyhow!(
            "no translator named {} (available: {})",
            translator_name,
            registry.names().join(", ")
        )
    })?;

    info!(
        product = %product,
        daily = %cfg.daily_dir.display(),
        chunk = %cfg.chunk_dir.display(),
        %beg,
        %end,
        repro = args.repro,
        "starting chunk backfill"
    );

    let mut driver = ChunkDriver::new(cfg, translator);
    let summary = driver.run_range(beg, end).await;
    summary.log();

    Ok(())
}
