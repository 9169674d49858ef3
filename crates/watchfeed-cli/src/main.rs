//! watchfeed - collects popular TMDB titles with their streaming providers.

/// Application configuration (TOML).
mod config;
/// JSON output writing.
mod output;

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use watchfeed_api::collector::Collector;
use watchfeed_api::media::MediaType;
use watchfeed_api::tmdb::TmdbClient;

use crate::config::AppConfig;
use crate::output::write_json_atomic;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Collect movies.
    Movies(FetchArgs),
    /// Collect TV series.
    Series(FetchArgs),
    /// Collect movies, then TV series, into their configured files.
    All(AllArgs),
}

/// Arguments for the `movies` and `series` subcommands.
#[derive(clap::Args)]
struct FetchArgs {
    /// Number of items to keep (default: from config).
    #[arg(long)]
    target: Option<usize>,

    /// Pages fetched concurrently per batch (default: from config).
    #[arg(long)]
    concurrency: Option<u32>,

    /// Output JSON file (default: from config).
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Arguments for the `all` subcommand.
#[derive(clap::Args)]
struct AllArgs {
    /// Pages fetched concurrently per batch (default: from config).
    #[arg(long)]
    concurrency: Option<u32>,
}

/// Builds a `TmdbClient` from config and the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the base URL is invalid
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .base_url(config.base_url()?)
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .discover_query(config.discover_query())
        .region(config.tmdb.region.clone())
        .image_base(config.image_base());
    if let Some(ref key) = config.tmdb.api_key {
        builder = builder.api_key(key.clone());
    }

    builder.build().context("failed to build TMDB client")
}

/// Collects one media type and writes it to `output`.
///
/// The file is written only after the whole collection succeeds.
///
/// # Errors
///
/// Returns an error if `concurrency` is zero, collection fails or the output
/// cannot be written.
#[instrument(skip_all, fields(media = %media))]
async fn run_collect(
    client: &TmdbClient,
    config: &AppConfig,
    media: MediaType,
    target: usize,
    concurrency: Option<u32>,
    output: &std::path::Path,
) -> Result<()> {
    let mut collector_config = config.collector_config()?;
    if let Some(c) = concurrency {
        collector_config.concurrency =
            NonZeroU32::new(c).context("--concurrency must be at least 1")?;
    }

    tracing::info!(
        target_count = target,
        concurrency = collector_config.concurrency.get(),
        output = %output.display(),
        "Collecting {media} items"
    );

    let collector = Collector::new(client, collector_config);
    let items = collector
        .collect(media, target)
        .await
        .with_context(|| format!("failed to collect {media} items"))?;

    write_json_atomic(output, &items)?;
    tracing::info!("Wrote {} {media} items to {}", items.len(), output.display());

    Ok(())
}

/// Runs the `movies` or `series` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built or collection fails.
async fn run_fetch(media: MediaType, args: &FetchArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let target = args.target.unwrap_or_else(|| config.target(media));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(media).to_path_buf());

    run_collect(&client, config, media, target, args.concurrency, &output).await
}

/// Runs the `all` subcommand: movies first, then series.
///
/// # Errors
///
/// Returns an error if the client cannot be built or either collection fails.
/// A series failure leaves the already written movie file in place.
async fn run_all(args: &AllArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    for media in [MediaType::Movie, MediaType::Series] {
        run_collect(
            &client,
            config,
            media,
            config.target(media),
            args.concurrency,
            config.output_path(media),
        )
        .await?;
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if configuration loading or the subcommand fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let config_path = AppConfig::locate(cli.dir.as_deref())?;
    let config = AppConfig::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration");

    match cli.command {
        Commands::Movies(args) => run_fetch(MediaType::Movie, &args, &config).await,
        Commands::Series(args) => run_fetch(MediaType::Series, &args, &config).await,
        Commands::All(args) => run_all(&args, &config).await,
    }
}
