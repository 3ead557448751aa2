//! Book recommendation lookup service.
//!
//! Serves a popular-books list, per-book details and "similar books"
//! recommendations from a precomputed dataset loaded once at startup.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod recommender;
pub mod server;
pub mod similarity;

// Re-export commonly used types for convenience
pub use catalog::{BookRecord, Catalog, PopularEntry};
pub use dataset::{load_dataset, Dataset};
pub use recommender::Recommender;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use similarity::{RecommendError, SimilarityIndex};
