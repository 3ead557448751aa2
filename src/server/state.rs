use axum::extract::FromRef;

use crate::catalog::Catalog;
use crate::dataset::Dataset;
use crate::recommender::Recommender;
use crate::similarity::SimilarityIndex;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalog = Arc<Catalog>;
pub type GuardedSimilarityIndex = Arc<SimilarityIndex>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub catalog: GuardedCatalog,
    pub similarity: GuardedSimilarityIndex,
    pub recommender: Recommender,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, dataset: &Dataset) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            started_at: chrono::Utc::now(),
            catalog: dataset.catalog.clone(),
            similarity: dataset.similarity.clone(),
            recommender: Recommender::from_dataset(dataset),
            hash: env!("BOOKREC_BUILD_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedSimilarityIndex {
    fn from_ref(input: &ServerState) -> Self {
        input.similarity.clone()
    }
}

impl FromRef<ServerState> for Recommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
