//! Envelope response format for JSON API responses.
//!
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": [],
//!   "_links": { "self": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// `null` is a legitimate payload (e.g. stats with no data).
    pub data: Option<T>,
    pub meta: ApiMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub request_id: String,
    pub timestamp: String,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    pub message: String,
}

impl ApiMeta {
    fn now(request_id: String, response_time_ms: u64) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::now(request_id, response_time_ms),
            errors: Vec::new(),
            links: HashMap::new(),
        }
    }

    pub fn with_link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.insert(rel.to_string(), href.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn error(code: &str, message: &str, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: None,
            meta: ApiMeta::now(request_id, response_time_ms),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            }],
            links: HashMap::new(),
        }
    }
}

/// Request id and start time for one handler invocation.
pub struct RequestTimer {
    request_id: String,
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7().to_string(),
            start: Instant::now(),
        }
    }

    pub fn respond<T: Serialize>(self, data: T) -> ApiResponse<T> {
        let elapsed = self.start.elapsed().as_millis() as u64;
        ApiResponse::success(data, self.request_id, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_payload_serializes_as_null() {
        let resp = ApiResponse::success(None::<u32>, "r1".to_string(), 3);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["data"].is_null());
        assert!(json.get("data").is_some());
        assert!(json.get("errors").is_none());
        assert_eq!(json["meta"]["request_id"], "r1");
    }

    #[test]
    fn error_envelope_shape() {
        let resp = ApiResponse::error("NOT_FOUND", "missing", "r2".to_string(), 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "NOT_FOUND");
    }

    #[test]
    fn links_are_included_when_present() {
        let resp = RequestTimer::start()
            .respond(1)
            .with_link("self", "/api/v1/unread-count");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["_links"]["self"], "/api/v1/unread-count");
    }
}
