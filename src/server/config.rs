use super::RequestsLoggingLevel;
use crate::similarity::DEFAULT_RECOMMENDATION_COUNT;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub content_cache_age_sec: usize,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
    pub recommendation_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 5000,
            content_cache_age_sec: 3600,
            static_dir: None,
            recommendation_count: DEFAULT_RECOMMENDATION_COUNT,
        }
    }
}
