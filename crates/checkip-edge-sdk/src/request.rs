//! HTTP Request representation for handlers
//!
//! The shape follows the API gateway proxy event, so a request can be
//! deserialized straight from the JSON the hosting platform hands over.

use crate::error::HandlerError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Represents an incoming HTTP request.
///
/// Every field is optional on the wire; gateways send `null` for absent
/// headers and query strings, and test events often carry only `httpMethod`.
/// A field holding an unexpected type is dropped rather than failing the
/// whole event, and non-string header or query values are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// HTTP method (GET, OPTIONS, ...)
    #[serde(default, deserialize_with = "lenient")]
    pub http_method: Option<String>,

    /// Request path (e.g., "/hello")
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<String>,

    /// HTTP headers
    #[serde(default, deserialize_with = "string_map")]
    pub headers: Option<HashMap<String, String>>,

    /// Query parameters
    #[serde(default, deserialize_with = "string_map")]
    pub query_string_parameters: Option<HashMap<String, String>>,

    /// Raw request body
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,

    /// Platform supplied request metadata
    #[serde(default, deserialize_with = "lenient")]
    pub request_context: Option<RequestContext>,
}

/// The subset of the gateway request context handlers care about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Request ID for tracing
    #[serde(default, deserialize_with = "lenient")]
    pub request_id: Option<String>,
}

/// Any value that does not fit `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the string-valued entries of an object; anything else becomes `None`.
fn string_map<'de, D>(deserializer: D) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => return Ok(None),
    };
    Ok(Some(
        map.into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
    ))
}

impl Request {
    /// Create a request with only the method set.
    ///
    /// # Example
    /// ```ignore
    /// let preflight = Request::with_method("OPTIONS");
    /// ```
    pub fn with_method(method: impl Into<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            ..Self::default()
        }
    }

    /// The HTTP method, if the event carried one.
    pub fn method(&self) -> Option<&str> {
        self.http_method.as_deref()
    }

    /// Check if the request method matches exactly.
    ///
    /// Gateways normalise methods to upper case, so the comparison is
    /// case-sensitive.
    pub fn is_method(&self, method: &str) -> bool {
        self.method() == Some(method)
    }

    /// Get a header value (case-insensitive lookup).
    ///
    /// # Example
    /// ```ignore
    /// let origin = req.header("origin");
    /// ```
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Get a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query_string_parameters.as_ref()?.get(key)
    }

    /// Request ID for log correlation, if the platform assigned one.
    pub fn request_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
    }

    /// Set the request ID (builder pattern).
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_context = Some(RequestContext {
            request_id: Some(request_id.into()),
        });
        self
    }

    /// Parse a request from a JSON event payload.
    ///
    /// Fails only when the payload is not a JSON object.
    pub fn from_json(payload: &[u8]) -> Result<Self, HandlerError> {
        Ok(serde_json::from_slice(payload)?)
    }
}
