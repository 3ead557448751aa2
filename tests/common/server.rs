//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own dataset directory.

use super::constants::*;
use super::fixtures::create_test_dataset;
use bookrec_server::dataset::{load_dataset, Dataset};
use bookrec_server::server::{
    make_app, make_metrics_app, metrics, RequestsLoggingLevel, ServerConfig,
};
use std::num::NonZeroUsize;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated dataset
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Base URL of the metrics listener
    pub metrics_base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The loaded dataset, shared with the running server
    pub dataset: Dataset,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _metrics_shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with response caching disabled
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns a new test server, letting the caller adjust the config first
    ///
    /// # Panics
    ///
    /// Panics if the dataset cannot be created or loaded, if port binding
    /// fails or if the server doesn't become ready within timeout.
    pub async fn spawn_with<F: FnOnce(&mut ServerConfig)>(configure: F) -> Self {
        let (temp_dir, data_dir, static_dir) =
            create_test_dataset().expect("Failed to create test dataset");

        let dataset = load_dataset(&data_dir, NonZeroUsize::new(16).unwrap())
            .expect("Failed to load test dataset");

        metrics::init_metrics();

        // Bind to random ports
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let metrics_listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind metrics port");
        let metrics_port = metrics_listener
            .local_addr()
            .expect("Failed to get metrics address")
            .port();

        let mut config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 0, // Disable caching in tests
            static_dir: Some(static_dir),
            ..ServerConfig::default()
        };
        configure(&mut config);

        let app = make_app(config, &dataset).expect("Failed to build app");
        let metrics_app = make_metrics_app(dataset.catalog.clone());

        // Spawn servers in background tasks with graceful shutdown
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let (metrics_shutdown_tx, metrics_shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(metrics_listener, metrics_app)
                .with_graceful_shutdown(async {
                    metrics_shutdown_rx.await.ok();
                })
                .await
                .expect("Metrics server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            metrics_base_url: format!("http://127.0.0.1:{}", metrics_port),
            port,
            dataset,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
            _metrics_shutdown_tx: Some(metrics_shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home page
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(tx) = self._metrics_shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
