//! checkip-edge - Main entry point
//!
//! Hosts the handler either as an IPC worker (length-prefixed JSON over
//! stdin/stdout) or as a local HTTP server, depending on `CHECKIP_EDGE_MODE`.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkip_edge::{AppConfig, CheckIpClient, RequestHandler, RunMode};

fn main() -> Result<()> {
    // Logs go to stderr; stdout is the IPC channel
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,checkip_edge=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    if let Some(problem) = config.endpoint_problem() {
        tracing::warn!(
            endpoint = %config.handler.endpoint_url,
            "Lookup endpoint is unusable ({}); requests will fail with 500",
            problem
        );
    }

    let lookup = CheckIpClient::new(&config.handler)?;
    let span = tracing::info_span!("checkip_handler", endpoint = %config.handler.endpoint_url);
    let handler = Arc::new(RequestHandler::new(lookup, span));

    let runtime = tokio::runtime::Runtime::new()?;

    match config.mode {
        RunMode::Ipc => {
            tracing::info!("Serving requests over stdin/stdout");
            checkip_edge_sdk::ipc::serve(&runtime, &handler)?;
            tracing::info!("Host closed stdin, exiting");
        }
        RunMode::Http => {
            let addr = SocketAddr::new(config.bind_addr, config.port);
            runtime.block_on(checkip_edge::server::serve(addr, handler))?;
        }
    }

    Ok(())
}
