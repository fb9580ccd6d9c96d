//! Transport seam between the client and the wire.
//!
//! The trait keeps the workflow testable against an in-memory backend; the
//! ureq implementation is the only code that touches real sockets.
use serde_json::Value;

use super::ApiError;

/// HTTP verbs the workflow uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One request against the versioned API base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base, e.g. `/rps/7/cpmk`.
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

/// Raw response before envelope unwrapping.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Executes requests; implemented by the ureq transport and by test fakes.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Blocking HTTP transport over a shared ureq agent.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    /// Create a transport for a versioned API base, e.g.
    /// `http://localhost:8080/api/v1`.
    pub fn new(base_url: String) -> Self {
        // Non-2xx statuses are data here, not transport errors; the client
        // unwraps them against the response envelope.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let bearer = request.token.as_ref().map(|token| format!("Bearer {token}"));

        let result = match request.method {
            Method::Get | Method::Delete => {
                let mut builder = match request.method {
                    Method::Get => self.agent.get(&url),
                    _ => self.agent.delete(&url),
                };
                if let Some(value) = bearer.as_deref() {
                    builder = builder.header("Authorization", value);
                }
                builder.call()
            }
            Method::Post | Method::Put => {
                let mut builder = match request.method {
                    Method::Post => self.agent.post(&url),
                    _ => self.agent.put(&url),
                };
                if let Some(value) = bearer.as_deref() {
                    builder = builder.header("Authorization", value);
                }
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}
