//! HTTP Response representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an outgoing HTTP response in API gateway proxy shape.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `ok(body)` | 200 | Successful response |
/// | `json(status, body)` | any | JSON body with a custom status |
/// | `HandlerError::to_response()` | 500/503 | Error envelope |
///
/// # CORS
///
/// ```ignore
/// Response::ok(json!({"message": "OK"})).with_cors(&Cors::default())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTP status code
    pub status_code: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body (JSON-encoded text)
    #[serde(default)]
    pub body: String,
}

impl Response {
    /// Create a new response with the given status code and an empty body.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Create a 200 OK response with JSON body.
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"message": "Success"}))
    /// Response::ok(my_struct) // If my_struct implements Serialize
    /// ```
    pub fn ok<T: Serialize>(body: T) -> Self {
        Self::json(200, body)
    }

    /// Create a JSON response with a custom status code.
    ///
    /// # Example
    /// ```ignore
    /// Response::json(503, json!({"message": "Service unavailable"}))
    /// ```
    pub fn json<T: Serialize>(status_code: u16, body: T) -> Self {
        Self::new(status_code)
            .with_header("Content-Type", "application/json")
            .with_body(serde_json::to_string(&body).unwrap_or_default())
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add CORS headers for cross-origin requests.
    pub fn with_cors(self, cors: &Cors) -> Self {
        self.with_header("Access-Control-Allow-Origin", cors.allow_origin.as_str())
            .with_header("Access-Control-Allow-Headers", cors.allow_headers.as_str())
            .with_header("Access-Control-Allow-Methods", cors.allow_methods.as_str())
    }

    /// Get a header value by exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// CORS permission headers attached to responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cors {
    pub allow_origin: String,
    pub allow_headers: String,
    pub allow_methods: String,
}

impl Default for Cors {
    /// Any origin, `Content-Type` only, `GET` and preflight.
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type".to_string(),
            allow_methods: "GET,OPTIONS".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let response = Response::ok(json!({"message": "OK"}));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body, r#"{"message":"OK"}"#);
    }

    #[test]
    fn test_default_cors_headers() {
        let response = Response::ok(json!({})).with_cors(&Cors::default());
        assert_eq!(response.headers.len(), 4);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Access-Control-Allow-Headers"), Some("Content-Type"));
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("GET,OPTIONS"));
    }

    #[test]
    fn test_gateway_wire_shape() {
        let response = Response::json(503, json!({"message": "Service unavailable"}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 503);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["body"], r#"{"message":"Service unavailable"}"#);
    }
}
