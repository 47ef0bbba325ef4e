//! The hello-world location handler
//!
//! `OPTIONS` is answered locally as a CORS preflight. Every other request
//! triggers one lookup, and its outcome picks the status:
//!
//! | Lookup outcome | Status | Body |
//! |----------------|--------|------|
//! | `Ok(ip)` | 200 | `{"message":"hello world","location":ip}` |
//! | `Network` | 503 | `{"message":"Service unavailable","error":...}` |
//! | `Other` | 500 | `{"message":"Internal server error","error":...}` |
//!
//! All responses carry the same CORS header set.

use checkip_edge_sdk::handler::{BoxFuture, Handler};
use checkip_edge_sdk::{Cors, HandlerError, Request, Response};
use serde::Serialize;
use tracing::{Instrument, Span};

use crate::lookup::{LocationLookup, LookupError};

/// Client-facing detail for a failed lookup.
pub const LOOKUP_UNAVAILABLE: &str = "Failed to fetch location information";

/// Client-facing detail for anything unanticipated.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Serialize)]
struct Ack<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct Greeting<'a> {
    message: &'a str,
    location: &'a str,
}

/// Answers requests with the caller's public IP.
pub struct RequestHandler<L> {
    lookup: L,
    cors: Cors,
    span: Span,
}

impl<L: LocationLookup> RequestHandler<L> {
    /// Create a handler that logs under `span` for its whole lifetime.
    pub fn new(lookup: L, span: Span) -> Self {
        Self {
            lookup,
            cors: Cors::default(),
            span,
        }
    }

    /// Handle one request. Never fails.
    pub async fn handle(&self, req: Request) -> Response {
        let span = tracing::info_span!(
            parent: &self.span,
            "request",
            request_id = req.request_id().unwrap_or("-"),
            method = req.method().unwrap_or("-")
        );
        self.respond(req).instrument(span).await
    }

    async fn respond(&self, req: Request) -> Response {
        if req.is_method("OPTIONS") {
            tracing::info!("Handling CORS preflight request");
            return Response::ok(Ack { message: "OK" }).with_cors(&self.cors);
        }

        tracing::info!(endpoint = %self.lookup.endpoint(), "Fetching IP address");

        let response = match self.lookup.fetch().await {
            Ok(ip) => {
                tracing::info!(ip = %ip, "Successfully fetched IP");
                Response::ok(Greeting {
                    message: "hello world",
                    location: &ip,
                })
            }
            Err(LookupError::Network(reason)) => {
                tracing::error!(error = %reason, "Network error fetching IP");
                HandlerError::ServiceUnavailable(LOOKUP_UNAVAILABLE.to_string()).to_response()
            }
            Err(LookupError::Other(reason)) => {
                tracing::error!(error = %reason, "Unexpected error fetching IP");
                HandlerError::Internal(UNEXPECTED_ERROR.to_string()).to_response()
            }
        };

        response.with_cors(&self.cors)
    }
}

impl<L: LocationLookup> Handler for RequestHandler<L> {
    fn call(&self, req: Request) -> BoxFuture<'_, Response> {
        Box::pin(self.handle(req))
    }
}
