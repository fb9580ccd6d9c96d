//! The single client wrapper every entity operation goes through.
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;

use super::{
    normalize_error_body, routes, ApiError, ApiRequest, ApiResponse, Created, Envelope, ListData,
    Method, RefreshedTokens, Transport,
};

/// Page size used when draining list endpoints.
const LIST_PAGE_LIMIT: u32 = 100;

/// Access and refresh tokens for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Bearer-authenticated JSON client with transparent refresh-on-401.
///
/// The token store is lock-guarded so callers queue behind a single refresh
/// exchange instead of racing it.
pub struct ApiClient {
    transport: Box<dyn Transport>,
    tokens: Mutex<TokenPair>,
}

impl ApiClient {
    pub fn new(transport: Box<dyn Transport>, tokens: TokenPair) -> Self {
        Self {
            transport,
            tokens: Mutex::new(tokens),
        }
    }

    /// Snapshot the current tokens, e.g. to persist a refreshed pair.
    pub fn tokens(&self) -> Result<TokenPair, ApiError> {
        Ok(self.lock_tokens()?.clone())
    }

    /// Fetch one resource from `data`.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let data = self.request(Method::Get, path, None)?;
        serde_json::from_value(data).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Drain a paginated list endpoint into one vector.
    pub fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let paged = format!("{path}{separator}page={page}&limit={LIST_PAGE_LIMIT}");
            let data = self.request(Method::Get, &paged, None)?;
            let mut list: ListData<T> = serde_json::from_value(data)
                .map_err(|err| ApiError::Decode(err.to_string()))?;
            items.append(&mut list.items);
            if page >= list.total_pages || list.total_pages == 0 {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    /// Create an entity and return the server-assigned id.
    pub fn create(&self, path: &str, payload: &impl Serialize) -> Result<u64, ApiError> {
        let body = to_body(payload)?;
        let data = self.request(Method::Post, path, Some(body))?;
        let created: Created =
            serde_json::from_value(data).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(created.id)
    }

    /// Update an entity in place.
    pub fn update(&self, path: &str, payload: &impl Serialize) -> Result<(), ApiError> {
        let body = to_body(payload)?;
        self.request(Method::Put, path, Some(body))?;
        Ok(())
    }

    /// Delete an entity by id path.
    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::Delete, path, None)?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let seen = self.tokens()?;
        let response = self.execute_with_token(method, path, body.clone(), &seen.token)?;
        let response = if response.status == 401 {
            let refreshed = self.refresh(&seen)?;
            self.execute_with_token(method, path, body, &refreshed.token)?
        } else {
            response
        };
        unwrap_envelope(path, &response)
    }

    fn execute_with_token(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.transport.execute(&ApiRequest {
            method,
            path: path.to_string(),
            body,
            token: Some(token.to_string()),
        })
    }

    /// Exchange the refresh token once; callers that lost the race reuse the
    /// pair installed by whoever won.
    fn refresh(&self, seen: &TokenPair) -> Result<TokenPair, ApiError> {
        let mut guard = self.lock_tokens()?;
        if *guard != *seen {
            return Ok(guard.clone());
        }
        tracing::debug!("access token rejected; exchanging refresh token");
        let response = self.transport.execute(&ApiRequest {
            method: Method::Post,
            path: routes::auth_refresh(),
            body: Some(serde_json::json!({ "refresh_token": guard.refresh_token })),
            token: None,
        })?;
        if response.status == 401 || response.status == 403 {
            return Err(ApiError::Auth);
        }
        let data = unwrap_envelope(&routes::auth_refresh(), &response)?;
        let refreshed: RefreshedTokens =
            serde_json::from_value(data).map_err(|err| ApiError::Decode(err.to_string()))?;
        *guard = TokenPair {
            token: refreshed.token,
            refresh_token: refreshed.refresh_token,
        };
        Ok(guard.clone())
    }

    fn lock_tokens(&self) -> Result<std::sync::MutexGuard<'_, TokenPair>, ApiError> {
        self.tokens
            .lock()
            .map_err(|_| ApiError::Transport("token store poisoned".to_string()))
    }
}

fn to_body(payload: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|err| ApiError::Decode(err.to_string()))
}

fn unwrap_envelope(path: &str, response: &ApiResponse) -> Result<Value, ApiError> {
    match response.status {
        404 => {
            return Err(ApiError::NotFound {
                path: path.to_string(),
            })
        }
        401 => return Err(ApiError::Auth),
        status if !(200..300).contains(&status) => {
            return Err(ApiError::Remote {
                status,
                message: normalize_error_body(&response.body),
            })
        }
        _ => {}
    }
    let envelope: Envelope<Value> = serde_json::from_str(&response.body)
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Remote {
            status: response.status,
            message: envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| normalize_error_body(&response.body)),
        });
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}
