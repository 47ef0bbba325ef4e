//! checkip-edge - a serverless endpoint that reports the caller's public IP
//!
//! - [`config`]: environment-backed configuration
//! - [`lookup`]: outbound IP lookup with typed failures
//! - [`handler`]: method routing and status mapping
//! - [`server`]: local axum host for development

pub mod config;
pub mod handler;
pub mod lookup;
pub mod server;

pub use config::{AppConfig, HandlerConfig, RunMode};
pub use handler::RequestHandler;
pub use lookup::{CheckIpClient, LocationLookup, LookupError};
