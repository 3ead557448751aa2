mod file_config;

pub use file_config::{FileConfig, RecommendationsConfig};

use crate::catalog::DEFAULT_LOOKUP_CACHE_CAPACITY;
use crate::server::RequestsLoggingLevel;
use crate::similarity::DEFAULT_RECOMMENDATION_COUNT;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub static_dir: Option<PathBuf>,
    pub recommendation_count: Option<usize>,
    pub lookup_cache_capacity: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub static_dir: Option<PathBuf>,
    pub recommendation_count: usize,
    pub lookup_cache_capacity: NonZeroUsize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if !data_dir.exists() {
            bail!("Data directory does not exist: {:?}", data_dir);
        }
        if !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let bind_address = file
            .bind_address
            .or_else(|| cli.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let static_dir = file
            .static_dir
            .map(PathBuf::from)
            .or_else(|| cli.static_dir.clone());

        let recommendations = file.recommendations.unwrap_or_default();
        let recommendation_count = recommendations
            .count
            .or(cli.recommendation_count)
            .unwrap_or(DEFAULT_RECOMMENDATION_COUNT);
        if recommendation_count == 0 {
            bail!("recommendation count must be greater than zero");
        }

        let lookup_cache_capacity = recommendations
            .lookup_cache_capacity
            .or(cli.lookup_cache_capacity)
            .unwrap_or(DEFAULT_LOOKUP_CACHE_CAPACITY);
        let lookup_cache_capacity = match NonZeroUsize::new(lookup_cache_capacity) {
            Some(capacity) => capacity,
            None => bail!("lookup cache capacity must be greater than zero"),
        };

        Ok(Self {
            data_dir,
            bind_address,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            static_dir,
            recommendation_count,
            lookup_cache_capacity,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
