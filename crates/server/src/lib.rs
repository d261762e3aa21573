//! Heatmap Server
//!
//! HTTP front end for the heatmap point index.
//!
//! # Endpoints
//!
//! - `GET /v1/ipv6?minLatitude=&maxLatitude=&minLongitude=&maxLongitude=`:
//!   points inside the box with their counts and the maximum count
//! - `POST /v1/admin/reload`: rebuild the index from the configured dataset
//!
//! # Example
//!
//! ```ignore
//! use heatmap_server::{AppState, ServerConfig, run_server};
//!
//! let listener = tokio::net::TcpListener::bind(config.api_host).await?;
//! run_server(listener, AppState::new(heatmap, None), &config, shutdown).await?;
//! ```

pub mod config;
pub mod handler;
pub mod transport;

pub use config::ServerConfig;
pub use handler::AppState;

pub use transport::http::{router, run_server};
