//! Local HTTP host - serves a handler over axum for development
//!
//! Every path except `/health` is translated into an SDK [`Request`], passed
//! to the handler, and the SDK [`Response`] is written back verbatim. Bodies
//! over 1 MiB are not forwarded.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use checkip_edge_sdk::Handler;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Largest request body forwarded to the handler.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the router that forwards requests to `handler`
pub fn create_router<H: Handler>(handler: Arc<H>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/{*path}", any(forward::<H>))
        .route("/", any(forward::<H>))
        .with_state(handler)
}

/// Bind `addr` and serve `handler` until the process is stopped.
pub async fn serve<H: Handler>(addr: SocketAddr, handler: Arc<H>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Local server listening on {}", listener.local_addr()?);

    let app = create_router(handler).layer(TraceLayer::new_for_http());
    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Translate an axum request, run the handler, translate the response back
async fn forward<H: Handler>(State(handler): State<Arc<H>>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let query: Option<HashMap<String, String>> = request.uri().query().map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    });

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    // An unreadable or oversized body is dropped; the handler still answers
    let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(b) if b.is_empty() => None,
        Ok(b) => Some(String::from_utf8_lossy(&b).to_string()),
        Err(e) => {
            tracing::warn!(request_id = %request_id, "Dropping unreadable body: {}", e);
            None
        }
    };

    let sdk_request = checkip_edge_sdk::Request {
        http_method: Some(method),
        path: Some(path),
        headers: Some(headers),
        query_string_parameters: query,
        body,
        ..Default::default()
    }
    .with_request_id(request_id.clone());

    let sdk_response = handler.call(sdk_request).await;

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(sdk_response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in &sdk_response.headers {
        builder = builder.header(key, value);
    }

    match builder.body(Body::from(sdk_response.body)) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to build response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
        }
    }
}
