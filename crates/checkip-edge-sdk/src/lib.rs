//! checkip-edge SDK - Types and utilities for writing checkip-edge handlers
//!
//! This crate provides the request/response types handlers exchange with
//! their host, the [`Handler`] trait, and the IPC framing used when a
//! handler runs as a worker process.

pub mod request;
pub mod response;
pub mod handler;
pub mod ipc;
pub mod error;

// Re-export key types at crate root
pub use request::Request;
pub use response::{Cors, Response};
pub use handler::Handler;
pub use error::HandlerError;
