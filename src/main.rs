use anyhow::Result;
use clap::Parser;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bookrec_server::config;
use bookrec_server::dataset::load_dataset;
use bookrec_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing the exported dataset (books.json, popular.json,
    /// similarity.json). Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub data_dir: Option<PathBuf>,

    /// The address to bind both listeners to.
    #[clap(long)]
    pub bind_address: Option<String>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of content in the cache in seconds, 0 disables the header.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Directory served under /static.
    #[clap(long, value_parser = parse_dir)]
    pub static_dir: Option<PathBuf>,

    /// How many recommendations the HTML form shows.
    #[clap(long)]
    pub recommendation_count: Option<usize>,

    /// Maximum number of memoized catalog lookups.
    #[clap(long)]
    pub lookup_cache_capacity: Option<usize>,

    /// Load and check the dataset, then exit without serving.
    #[clap(long)]
    pub check_only: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            data_dir: args.data_dir.clone(),
            bind_address: args.bind_address.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            static_dir: args.static_dir.clone(),
            recommendation_count: args.recommendation_count,
            lookup_cache_capacity: args.lookup_cache_capacity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  data_dir: {:?}", app_config.data_dir);
    info!("  bind_address: {}", app_config.bind_address);
    info!("  port: {}", app_config.port);
    info!("  recommendation_count: {}", app_config.recommendation_count);
    info!("  lookup_cache_capacity: {}", app_config.lookup_cache_capacity);

    let dataset = load_dataset(&app_config.data_dir, app_config.lookup_cache_capacity)?;

    if cli_args.check_only {
        info!("Dataset check completed, exiting.");
        return Ok(());
    }

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_dataset_metrics(
        dataset.catalog.get_books_count(),
        dataset.catalog.get_popular_count(),
        dataset.similarity.dimension(),
    );

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        content_cache_age_sec: app_config.content_cache_age_sec,
        static_dir: app_config.static_dir.clone(),
        recommendation_count: app_config.recommendation_count,
    };

    run_server(
        dataset,
        server_config,
        &app_config.bind_address,
        app_config.metrics_port,
    )
    .await
}
