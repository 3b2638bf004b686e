use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nr_core::config::{Settings, StorageSettings};
use nr_core::logging::init_logging;
use nr_core::{ArticleSummary, CorpusStats, Result, SnapshotStorage};
use nr_fetch::cli::{build_gateway, FetchArgs};
use nr_inference::{create_sentiment_model, EnrichmentProcessor, RecommendationEngine};
use nr_storage::{create_storage, DEFAULT_DB_FILE};
use nr_web::AppState;
use tracing::{info, warn};

mod duration;
mod pipeline;

use duration::HumanDuration;
use pipeline::{enrich_stored, Pipeline};

#[derive(Parser)]
#[command(name = "nr", author, version, about = "News ingestion, enrichment and recommendation")]
struct Cli {
    /// TOML config file (defaults to $NR_CONFIG, then ./nr.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot backend: memory, json or sqlite
    #[arg(long, global = true)]
    storage: Option<String>,

    /// Data directory for the json and sqlite backends
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Sentiment scorer used while enriching: lexicon or neutral
    #[arg(long, global = true, default_value = "lexicon")]
    sentiment: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every category/region pair and store the raw snapshot
    Fetch {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Enrich the stored raw snapshot into the corpus
    Process,
    /// Fetch, store and enrich, once or on an interval
    Pipeline {
        #[command(flatten)]
        fetch: FetchArgs,
        /// Repeat every interval (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Rank the stored corpus for a set of preferred topics
    Recommend {
        /// Comma-separated topics (e.g. technology,science)
        #[arg(long, value_delimiter = ',')]
        prefs: Vec<String>,
        #[arg(short = 'n', long, default_value_t = 10)]
        n: usize,
    },
    /// Print corpus statistics as JSON
    Stats,
    /// Serve the recommendation API
    Serve {
        /// Address to bind, overrides server.bind
        #[arg(long)]
        bind: Option<String>,
    },
}

/// `--storage` and `--data-dir` beat the config file. For sqlite the data
/// directory holds the database file.
fn apply_storage_flags(settings: &mut StorageSettings, kind: Option<&str>, data_dir: Option<&PathBuf>) {
    if let Some(kind) = kind {
        settings.kind = kind.trim().to_lowercase();
    }
    if let Some(dir) = data_dir {
        let location = if settings.kind == "sqlite" {
            dir.join(DEFAULT_DB_FILE)
        } else {
            dir.clone()
        };
        settings.location = Some(location.to_string_lossy().to_string());
    }
}

fn processor(name: &str) -> Result<EnrichmentProcessor> {
    Ok(EnrichmentProcessor::new(create_sentiment_model(name)?))
}

async fn load_engine(storage: &dyn SnapshotStorage) -> Result<RecommendationEngine> {
    let engine = RecommendationEngine::new();
    match storage.load_corpus().await {
        Ok(corpus) => {
            if let Err(e) = engine.train(corpus).await {
                warn!("⚠️ Starting untrained: {}", e);
            }
        }
        Err(e) => warn!("⚠️ No corpus to train on yet: {}", e),
    }
    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = init_logging(&cli.log_level);

    let mut settings = Settings::load(cli.config.as_deref())?;
    apply_storage_flags(&mut settings.storage, cli.storage.as_deref(), cli.data_dir.as_ref());
    let storage = create_storage(&settings.storage.kind, settings.storage.location.as_deref()).await?;

    match cli.command {
        Commands::Fetch { fetch } => {
            fetch.apply(&mut settings.fetch);
            settings.validate()?;
            let gateway = build_gateway(&settings.fetch)?;
            let raw = gateway.fetch_all().await;
            if raw.is_empty() {
                logger.warn("📭 Nothing fetched, keeping the previous raw snapshot");
            } else {
                storage.store_raw(&raw).await?;
                logger.info(&format!("💾 Stored {} raw articles", raw.len()));
            }
        }
        Commands::Process => {
            let corpus = enrich_stored(&processor(&cli.sentiment)?, storage.as_ref()).await?;
            logger.info(&format!("💾 Stored corpus of {} articles", corpus.len()));
        }
        Commands::Pipeline { fetch, interval } => {
            fetch.apply(&mut settings.fetch);
            settings.validate()?;
            let pipeline = Pipeline::new(
                build_gateway(&settings.fetch)?,
                processor(&cli.sentiment)?,
                storage,
            );
            match interval {
                Some(interval) => {
                    info!("🔁 Running the pipeline every {}", interval);
                    pipeline.run_periodic(interval.0).await;
                }
                None => {
                    pipeline.run_once().await?;
                }
            }
        }
        Commands::Recommend { prefs, n } => {
            let engine = RecommendationEngine::new();
            engine.train(storage.load_corpus().await?).await?;

            let prefs = if prefs.is_empty() {
                settings.server.default_preferences.clone()
            } else {
                prefs
            };
            for (rank, scored) in engine.recommend_scored(&prefs, n).await.iter().enumerate() {
                let summary = ArticleSummary::from(&scored.article);
                println!(
                    "{:>2}. [{:.3}] {} ({}, {})",
                    rank + 1,
                    scored.score,
                    summary.title,
                    summary.category.as_str(),
                    summary.source
                );
                if !summary.url.is_empty() {
                    println!("      {}", summary.url);
                }
            }
        }
        Commands::Stats => {
            let corpus = storage.load_corpus().await?;
            let stats = CorpusStats::from_articles(&corpus);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
            let engine = Arc::new(load_engine(storage.as_ref()).await?);
            let state = AppState::new(engine, storage, settings.server.clone());
            nr_web::serve(state, &bind).await?;
        }
    }

    Ok(())
}
