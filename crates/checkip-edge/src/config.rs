//! Application configuration

use std::env;
use std::net::IpAddr;
use std::time::Duration;

/// Default lookup target: echoes the caller's public IP as plain text.
pub const DEFAULT_ENDPOINT_URL: &str = "http://checkip.amazonaws.com/";

/// Upper bound on the outbound lookup, connect through body read.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration handed to the lookup client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Overrides the default lookup target
    pub endpoint_url: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
        }
    }
}

/// How the binary hosts the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Length-prefixed JSON frames over stdin/stdout
    Ipc,
    /// Local axum server
    Http,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ipc" => Some(RunMode::Ipc),
            "http" => Some(RunMode::Http),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Lookup client settings
    pub handler: HandlerConfig,

    /// Hosting mode
    pub mode: RunMode,

    /// Address the local server binds to
    pub bind_addr: IpAddr,

    /// Port for the local server
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            handler: HandlerConfig {
                endpoint_url: lookup("CHECKIP_URL")
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string()),
            },

            mode: lookup("CHECKIP_EDGE_MODE")
                .and_then(|s| RunMode::parse(&s))
                .unwrap_or(RunMode::Http),

            bind_addr: lookup("CHECKIP_EDGE_BIND")
                .and_then(|s| s.parse().ok())
                .unwrap_or(IpAddr::from([127, 0, 0, 1])),

            port: lookup("CHECKIP_EDGE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Returns a description of why the endpoint URL is unusable, if it is.
    ///
    /// An unusable URL is not fatal; each request answers 500 instead.
    pub fn endpoint_problem(&self) -> Option<String> {
        match url::Url::parse(&self.handler.endpoint_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => None,
            Ok(url) => Some(format!("unsupported scheme '{}'", url.scheme())),
            Err(e) => Some(e.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
