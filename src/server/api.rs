//! Read-only JSON mirror of the HTML surface, mounted under `/v1`.

use std::time::Duration;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::metrics::record_recommendation;
use super::pages::{purchase_links, PurchaseLink};
use super::state::{GuardedCatalog, GuardedSimilarityIndex, ServerState};
use super::{http_cache, ServerConfig};
use crate::catalog::{BookRecord, CacheStats};
use crate::recommender::Recommender;
use crate::similarity::RecommendError;

pub const MAX_API_RECOMMENDATION_COUNT: usize = 50;

#[derive(Serialize)]
struct DatasetStats {
    books: usize,
    popular: usize,
    known_titles: usize,
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub started_at: String,
    pub hash: String,
    pub dataset: DatasetStats,
    pub lookup_cache: CacheStats,
}

#[derive(Serialize)]
struct BookDetails {
    #[serde(flatten)]
    book: BookRecord,
    purchase_links: Vec<PurchaseLink>,
}

#[derive(Serialize)]
struct RecommendResponse {
    title: String,
    recommendations: Vec<BookRecord>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RecommendQuery {
    pub count: Option<usize>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Requested count, falling back to the configured default and clamped to
/// `1..=MAX_API_RECOMMENDATION_COUNT`.
fn effective_count(requested: Option<usize>, default_count: usize) -> usize {
    requested
        .unwrap_or(default_count)
        .clamp(1, MAX_API_RECOMMENDATION_COUNT)
}

async fn get_stats(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        started_at: state.started_at.to_rfc3339(),
        hash: state.hash.clone(),
        dataset: DatasetStats {
            books: state.catalog.get_books_count(),
            popular: state.catalog.get_popular_count(),
            known_titles: state.similarity.dimension(),
        },
        lookup_cache: state.catalog.cache_stats(),
    };
    Json(stats)
}

async fn get_popular(State(catalog): State<GuardedCatalog>) -> Response {
    Json(catalog.popular_list()).into_response()
}

async fn get_titles(State(similarity): State<GuardedSimilarityIndex>) -> Response {
    Json(similarity.known_titles()).into_response()
}

async fn get_book(
    State(catalog): State<GuardedCatalog>,
    title: Result<Path<String>, PathRejection>,
) -> Response {
    let Ok(Path(title)) = title else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match catalog.lookup(&title) {
        Some(book) => Json(BookDetails {
            purchase_links: purchase_links(&book.isbn),
            book,
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_recommendations(
    State(recommender): State<Recommender>,
    State(config): State<ServerConfig>,
    title: Result<Path<String>, PathRejection>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> Response {
    let Ok(Path(title)) = title else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Ok(Query(query)) = query else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let count = effective_count(query.count, config.recommendation_count);
    match recommender.resolve_detailed(&title, count) {
        Ok(resolution) => {
            record_recommendation("served", resolution.unresolved.len());
            Json(RecommendResponse {
                title,
                recommendations: resolution.books,
            })
            .into_response()
        }
        Err(RecommendError::UnknownTitle(_)) => {
            record_recommendation("unknown_title", 0);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub fn make_api_routes(state: ServerState) -> Router {
    let content_routes: Router = Router::new()
        .route("/popular", get(get_popular))
        .route("/titles", get(get_titles))
        .route("/book/{title}", get(get_book))
        .route("/recommend/{title}", get(get_recommendations))
        .layer(middleware::from_fn_with_state(
            state.config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let stats_routes: Router = Router::new()
        .route("/stats", get(get_stats))
        .with_state(state);

    stats_routes.merge(content_routes)
}
