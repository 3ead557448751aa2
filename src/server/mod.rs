mod api;
pub mod config;
mod http_layers;
pub mod metrics;
pub mod pages;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use pages::PageError;
pub use server::{make_app, make_metrics_app, run_server};
