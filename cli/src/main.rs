//! taborg - group browser tabs by domain, meaning and density.

mod config;
mod inputs;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use taborg_categorize::{Categorizer, GroupRequest, Organizer, PatternStore, RecordingSink, realize};
use taborg_cluster::{DEFAULT_K, Dbscan};
use taborg_embeddings::{
    CachedProvider, Embedding, EmbeddingCache, EmbeddingProvider, OpenAIProvider,
};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{Config, EmbeddingConfig, EmbeddingProviderType};

/// Group browser tabs by domain, meaning and density.
#[derive(Parser, Debug)]
#[command(name = "taborg")]
#[command(version)]
struct Cli {
    /// Config file (default is <config_dir>/taborg/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the hybrid categorization pipeline over a tabs file
    Categorize {
        /// JSON array of {id, title, url, content?} records
        #[arg(short, long)]
        input: PathBuf,

        /// Embedding provider (overrides the config file)
        #[arg(long, value_enum)]
        embed: Option<EmbeddingProviderType>,

        /// Minimum similarity for semantic matching
        #[arg(long)]
        threshold: Option<f32>,

        /// Smallest cluster that becomes its own group
        #[arg(long)]
        min_cluster_size: Option<usize>,

        /// Seed for group colors
        #[arg(long)]
        seed: Option<u64>,

        /// Record a grouping pattern for every group
        #[arg(long)]
        record_patterns: bool,
    },

    /// Plan domain-first groups for a whole window
    Organize {
        /// JSON array of {id, title, url} records
        #[arg(short, long)]
        input: PathBuf,

        /// Precomputed embeddings keyed by item id; skips the provider
        #[arg(long)]
        embeddings: Option<PathBuf>,

        /// Upper bound on the clustering radius
        #[arg(long)]
        epsilon_cap: Option<f32>,

        /// Seed for group colors
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Cluster precomputed embeddings with DBSCAN
    Cluster {
        /// JSON object mapping ids to vectors
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value_t = taborg_cluster::DEFAULT_EPSILON)]
        epsilon: f32,

        #[arg(long, default_value_t = taborg_cluster::DEFAULT_MIN_POINTS)]
        min_points: usize,
    },

    /// Estimate a clustering radius for precomputed embeddings
    SuggestEpsilon {
        /// JSON object mapping ids to vectors
        #[arg(short, long)]
        input: PathBuf,

        /// Neighbor rank
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,
    },
}

/// Planned groups and what the sink accepted.
#[derive(Serialize)]
struct Report<T> {
    #[serde(flatten)]
    result: T,
    created: usize,
    requests: Vec<GroupRequest>,
}

#[derive(Serialize)]
struct EpsilonReport {
    epsilon: f32,
    k: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Categorize {
            input,
            embed,
            threshold,
            min_cluster_size,
            seed,
            record_patterns,
        } => {
            let mut options = config.categorize;
            if let Some(threshold) = threshold {
                options.similarity_threshold = threshold;
            }
            if let Some(size) = min_cluster_size {
                options.min_cluster_size = size;
            }

            let mut embedding = config.embedding;
            if let Some(provider) = embed {
                embedding.provider = provider;
            }
            let provider = build_provider(&embedding).await?;
            let provider = match provider {
                Some(provider) if !provider.is_available() => {
                    warn!(
                        provider = provider.name(),
                        "embedding provider not configured; using domain and keyword matching only"
                    );
                    None
                }
                other => other,
            };

            let items = inputs::read_items(&input)?;
            let mut categorizer = Categorizer::new(options);
            if let Some(seed) = seed {
                categorizer = categorizer.with_color_seed(seed);
            }
            let result = categorizer.categorize(items, provider.as_deref()).await?;

            if record_patterns || config.patterns.record {
                let store =
                    PatternStore::open(&config.patterns.path, config.patterns.max_patterns);
                let stored = store.record(&result.groups).await.with_context(|| {
                    format!("failed to record patterns in {}", store.path().display())
                })?;
                info!(stored, "recorded grouping patterns");
            }

            let requests = result.requests();
            let (created, requests) = realize_all(&requests).await;
            print_json(&Report {
                result,
                created,
                requests,
            })
        }

        Command::Organize {
            input,
            embeddings,
            epsilon_cap,
            seed,
        } => {
            let mut options = config.organize;
            if let Some(cap) = epsilon_cap {
                options.epsilon_cap = cap;
            }
            let mut organizer = Organizer::new(options);
            if let Some(seed) = seed {
                organizer = organizer.with_color_seed(seed);
            }

            let items = inputs::read_items(&input)?;
            let plan = match embeddings {
                Some(path) => {
                    let embeddings = inputs::read_embeddings(&path)?;
                    organizer.plan(&items, &embeddings)?
                }
                None => {
                    let Some(provider) = build_provider(&config.embedding).await? else {
                        bail!("organize needs an embedding provider or --embeddings");
                    };
                    if !provider.is_available() {
                        bail!(
                            "embedding provider {} is not configured (set OPENAI_API_KEY)",
                            provider.name()
                        );
                    }
                    organizer.organize(&items, provider.as_ref()).await?
                }
            };

            let (created, requests) = realize_all(&plan.groups).await;
            print_json(&Report {
                result: plan,
                created,
                requests,
            })
        }

        Command::Cluster {
            input,
            epsilon,
            min_points,
        } => {
            let embeddings: IndexMap<String, Embedding> = inputs::read_embeddings(&input)?;
            let result = Dbscan::new(epsilon, min_points).cluster(&embeddings)?;
            print_json(&result)
        }

        Command::SuggestEpsilon { input, k } => {
            let embeddings: IndexMap<String, Embedding> = inputs::read_embeddings(&input)?;
            let epsilon = taborg_cluster::suggest_epsilon(&embeddings, k)?;
            print_json(&EpsilonReport { epsilon, k })
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

/// Build the configured provider, wrapped in a cache when enabled.
async fn build_provider(config: &EmbeddingConfig) -> Result<Option<Box<dyn EmbeddingProvider>>> {
    if config.provider == EmbeddingProviderType::None {
        return Ok(None);
    }

    let mut provider = OpenAIProvider::new();
    if let Some(model) = &config.model {
        provider = provider.with_model(model);
    }
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url);
    }

    if !config.cache_enabled {
        return Ok(Some(Box::new(provider)));
    }

    let cache = match &config.cache_path {
        Some(path) => EmbeddingCache::with_persistence(path, config.cache_max_entries)
            .await
            .with_context(|| format!("failed to open embedding cache {}", path.display()))?,
        None => EmbeddingCache::new(config.cache_max_entries),
    };
    Ok(Some(Box::new(CachedProvider::new(provider, cache))))
}

/// Pass requests through an in-memory sink; returns what it accepted.
async fn realize_all(requests: &[GroupRequest]) -> (usize, Vec<GroupRequest>) {
    let sink = RecordingSink::new();
    let created = realize(requests, &sink).await;
    (created, sink.requests().await)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
