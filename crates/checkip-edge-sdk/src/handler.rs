//! The handler seam between a hosting runtime and handler logic
//!
//! A host (the IPC loop, a local HTTP server, a serverless platform adapter)
//! owns a value implementing [`Handler`] and feeds it one [`Request`] per
//! invocation. Handlers never fail: every error is turned into a
//! [`Response`] before it reaches the host.
//!
//! # Example
//!
//! ```ignore
//! use checkip_edge_sdk::handler::{BoxFuture, Handler};
//! use checkip_edge_sdk::{Request, Response};
//! use serde_json::json;
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     fn call(&self, _req: Request) -> BoxFuture<'_, Response> {
//!         Box::pin(async { Response::ok(json!({"message": "Hello!"})) })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Request, Response};

/// Type alias for boxed future returned by handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait implemented by request handlers
pub trait Handler: Send + Sync + 'static {
    /// Handle a single request.
    fn call(&self, req: Request) -> BoxFuture<'_, Response>;
}

impl<H: Handler> Handler for Arc<H> {
    fn call(&self, req: Request) -> BoxFuture<'_, Response> {
        (**self).call(req)
    }
}
