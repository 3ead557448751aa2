use anyhow::{Context, Result};
use std::any::Any;
use tracing::{debug, error, info};

use crate::dataset::Dataset;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    handler::HandlerWithoutStateExt,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use super::api::make_api_routes;
use super::metrics::{metrics_handler, record_recommendation};
use super::pages::*;
use super::{http_cache, log_requests, slowdown_request, state::*, ServerConfig};
use crate::similarity::RecommendError;
use axum::http::StatusCode;

#[derive(Deserialize, Debug, Default)]
struct RecommendForm {
    #[serde(default)]
    pub user_input: String,
}

async fn home(State(catalog): State<GuardedCatalog>) -> Response {
    let page = IndexPage {
        books: catalog.popular_list().iter().map(PopularCard::from).collect(),
    };
    render(StatusCode::OK, &page)
}

async fn recommend_ui(State(similarity): State<GuardedSimilarityIndex>) -> Response {
    let page = RecommendPage {
        titles: similarity.known_titles(),
        query: String::new(),
        results: vec![],
        searched: false,
    };
    render(StatusCode::OK, &page)
}

async fn recommend_books(
    State(state): State<ServerState>,
    form: Result<Form<RecommendForm>, FormRejection>,
) -> Result<Response, PageError> {
    // An unreadable form is treated like a missing field.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Rejected recommendation form: {}", rejection);
            RecommendForm::default()
        }
    };
    let query = form.user_input.trim();
    if query.is_empty() {
        record_recommendation("empty_input", 0);
        return Err(PageError::Validation(MESSAGE_EMPTY_INPUT));
    }

    let resolution = match state
        .recommender
        .resolve_detailed(query, state.config.recommendation_count)
    {
        Ok(resolution) => resolution,
        Err(RecommendError::UnknownTitle(_)) => {
            record_recommendation("unknown_title", 0);
            return Err(PageError::NotFound(MESSAGE_UNKNOWN_TITLE));
        }
    };
    record_recommendation("served", resolution.unresolved.len());

    let page = RecommendPage {
        titles: state.similarity.known_titles(),
        query: query.to_owned(),
        results: resolution.books.iter().map(BookCard::from).collect(),
        searched: true,
    };
    Ok(render(StatusCode::OK, &page))
}

async fn book_details(
    State(catalog): State<GuardedCatalog>,
    title: Result<Path<String>, PathRejection>,
) -> Result<Response, PageError> {
    // A title that cannot be decoded cannot be in the catalog either.
    let Path(title) = title.map_err(|rejection| {
        debug!("Rejected book path: {}", rejection);
        PageError::NotFound(MESSAGE_BOOK_NOT_FOUND)
    })?;
    let book = catalog
        .lookup(&title)
        .ok_or(PageError::NotFound(MESSAGE_BOOK_NOT_FOUND))?;
    let page = BookDetailsPage {
        purchase_links: purchase_links(&book.isbn),
        book,
    };
    Ok(render(StatusCode::OK, &page))
}

async fn not_found() -> PageError {
    PageError::NotFound(MESSAGE_PAGE_NOT_FOUND)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!("Request handler panicked: {}", details);
    PageError::Internal.into_response()
}

/// Wraps `app` with the layers every route goes through. Panics are turned
/// into the error page below the request logger so they are logged and
/// counted like any other 500.
fn with_common_layers(mut app: Router, state: &ServerState) -> Router {
    app = app.layer(CatchPanicLayer::custom(handle_panic));
    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app.layer(middleware::from_fn_with_state(state.clone(), log_requests))
}

pub fn make_app(config: ServerConfig, dataset: &Dataset) -> Result<Router> {
    let state = ServerState::new(config.clone(), dataset);

    let content_routes: Router = Router::new()
        .route("/", get(home))
        .route("/book/{title}", get(book_details))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let recommend_routes: Router = Router::new()
        .route("/recommend", get(recommend_ui))
        .route("/recommend_books", post(recommend_books))
        .with_state(state.clone());

    let mut app: Router = content_routes
        .merge(recommend_routes)
        .nest("/v1", make_api_routes(state.clone()));

    if let Some(static_dir) = &config.static_dir {
        if !static_dir.is_dir() {
            anyhow::bail!("Static directory does not exist: {:?}", static_dir);
        }
        let static_files =
            ServeDir::new(static_dir).not_found_service(not_found.into_service());
        app = app.nest_service("/static", static_files);
    }
    app = app.fallback(not_found);

    Ok(with_common_layers(app, &state))
}

pub fn make_metrics_app(catalog: GuardedCatalog) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(catalog)
}

pub async fn run_server(
    dataset: Dataset,
    config: ServerConfig,
    bind_address: &str,
    metrics_port: u16,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, &dataset)?;
    let metrics_app = make_metrics_app(dataset.catalog.clone());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_address, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind_address, port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_address, metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app) => {
            info!("HTTP server stopped: {:?}", result);
            Ok(result?)
        },
        result = axum::serve(metrics_listener, metrics_app) => {
            info!("Metrics server stopped: {:?}", result);
            Ok(result?)
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
