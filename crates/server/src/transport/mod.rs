//! Transport layer for the heatmap server
//!
//! Available transports:
//! - `http` - HTTP/JSON API
pub mod http;
