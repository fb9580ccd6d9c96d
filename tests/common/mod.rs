//! In-memory backend for workflow integration tests.
//!
//! Implements the transport seam with a small entity store so tests can
//! exercise pull, submission, and token refresh without sockets.
#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rps_author::api::{ApiClient, ApiRequest, ApiResponse, Method, TokenPair, Transport};

pub const ACCESS_TOKEN: &str = "tok-1";
pub const REFRESH_TOKEN: &str = "ref-1";

/// Collection keys used by the store.
pub const KINDS: [&str; 7] = [
    "cpmk",
    "sub_cpmk",
    "weekly_plan",
    "assignments",
    "analysis",
    "bibliography",
    "grading_scale",
];

struct Failure {
    method: String,
    fragment: String,
    status: u16,
    message: String,
}

struct MockState {
    rps_id: u64,
    valid_token: String,
    refresh_token: String,
    document: Value,
    courses: Vec<Value>,
    outcomes: Vec<Value>,
    collections: BTreeMap<&'static str, Vec<Value>>,
    /// Sub-outcome id to owning outcome id.
    sub_parents: BTreeMap<u64, u64>,
    next_id: u64,
    failures: Vec<Failure>,
    log: Vec<(String, String)>,
    refresh_count: u32,
}

/// Cloneable handle; the clone handed to the client shares state with the
/// handle the test keeps for assertions.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new(rps_id: u64) -> Self {
        let collections = KINDS.iter().map(|kind| (*kind, Vec::new())).collect();
        Self {
            state: Arc::new(Mutex::new(MockState {
                rps_id,
                valid_token: ACCESS_TOKEN.to_string(),
                refresh_token: REFRESH_TOKEN.to_string(),
                document: json!({}),
                courses: Vec::new(),
                outcomes: Vec::new(),
                collections,
                sub_parents: BTreeMap::new(),
                next_id: 100,
                failures: Vec::new(),
                log: Vec::new(),
                refresh_count: 0,
            })),
        }
    }

    /// Client wired to this backend with the initial token pair.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(
            Box::new(self.clone()),
            TokenPair {
                token: ACCESS_TOKEN.to_string(),
                refresh_token: REFRESH_TOKEN.to_string(),
            },
        )
    }

    /// Client holding a stale access token; the first call will 401.
    pub fn client_with_stale_token(&self) -> ApiClient {
        ApiClient::new(
            Box::new(self.clone()),
            TokenPair {
                token: "tok-stale".to_string(),
                refresh_token: REFRESH_TOKEN.to_string(),
            },
        )
    }

    pub fn set_document(&self, fields: Value) {
        self.state.lock().unwrap().document = fields;
    }

    pub fn set_courses(&self, courses: Vec<Value>) {
        self.state.lock().unwrap().courses = courses;
    }

    pub fn set_outcomes(&self, outcomes: Vec<Value>) {
        self.state.lock().unwrap().outcomes = outcomes;
    }

    /// Seed one entity, returning its assigned id.
    pub fn seed(&self, kind: &str, mut value: Value) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        value["id"] = json!(id);
        state
            .collections
            .get_mut(kind)
            .unwrap_or_else(|| panic!("unknown kind {kind}"))
            .push(value);
        id
    }

    pub fn seed_sub_cpmk(&self, parent_id: u64, value: Value) -> u64 {
        let id = self.seed("sub_cpmk", value);
        self.state.lock().unwrap().sub_parents.insert(id, parent_id);
        id
    }

    /// Script one failure for the next matching request.
    pub fn fail_once(&self, method: &str, fragment: &str, status: u16, message: &str) {
        self.state.lock().unwrap().failures.push(Failure {
            method: method.to_string(),
            fragment: fragment.to_string(),
            status,
            message: message.to_string(),
        });
    }

    /// Invalidate the access token without touching the refresh token.
    pub fn expire_access_token(&self) {
        self.state.lock().unwrap().valid_token = "tok-2".to_string();
    }

    /// Invalidate the refresh token so the exchange itself fails.
    pub fn revoke_refresh_token(&self) {
        self.state.lock().unwrap().refresh_token = "ref-revoked".to_string();
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn refresh_count(&self) -> u32 {
        self.state.lock().unwrap().refresh_count
    }

    pub fn collection(&self, kind: &str) -> Vec<Value> {
        self.state.lock().unwrap().collections[kind].clone()
    }

    pub fn collection_len(&self, kind: &str) -> usize {
        self.state.lock().unwrap().collections[kind].len()
    }

    pub fn document(&self) -> Value {
        self.state.lock().unwrap().document.clone()
    }
}

fn ok(data: Value) -> ApiResponse {
    ApiResponse {
        status: 200,
        body: json!({ "success": true, "data": data }).to_string(),
    }
}

fn fail(status: u16, message: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: json!({ "success": false, "message": message }).to_string(),
    }
}

fn list_page(items: &[Value], query: &str) -> Value {
    let mut page = 1usize;
    let mut limit = 100usize;
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("page=") {
            page = value.parse().unwrap_or(1);
        }
        if let Some(value) = pair.strip_prefix("limit=") {
            limit = value.parse().unwrap_or(100);
        }
    }
    let total_items = items.len();
    let total_pages = total_items.div_ceil(limit).max(1);
    let start = (page - 1) * limit;
    let slice: Vec<Value> = items.iter().skip(start).take(limit).cloned().collect();
    json!({
        "items": slice,
        "page": page,
        "limit": limit,
        "total_items": total_items,
        "total_pages": total_pages,
    })
}

fn kind_for_segment(segment: &str) -> Option<&'static str> {
    match segment {
        "cpmk" => Some("cpmk"),
        "sub-cpmk" => Some("sub_cpmk"),
        "weekly-plan" => Some("weekly_plan"),
        "assignments" => Some("assignments"),
        "analysis" => Some("analysis"),
        "bibliography" => Some("bibliography"),
        "grading-scale" => Some("grading_scale"),
        _ => None,
    }
}

impl Transport for MockBackend {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, rps_author::api::ApiError> {
        let mut state = self.state.lock().unwrap();
        state
            .log
            .push((request.method.as_str().to_string(), request.path.clone()));

        if let Some(index) = state.failures.iter().position(|failure| {
            failure.method == request.method.as_str() && request.path.contains(&failure.fragment)
        }) {
            let failure = state.failures.remove(index);
            return Ok(fail(failure.status, &failure.message));
        }

        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (request.path.as_str(), ""),
        };

        if request.method == Method::Post && path == "/auth/refresh" {
            let presented = request
                .body
                .as_ref()
                .and_then(|body| body["refresh_token"].as_str())
                .unwrap_or_default();
            if presented != state.refresh_token {
                return Ok(fail(401, "invalid refresh token"));
            }
            state.refresh_count += 1;
            let n = state.refresh_count + 1;
            state.valid_token = format!("tok-{n}");
            state.refresh_token = format!("ref-{n}");
            return Ok(ok(json!({
                "token": state.valid_token,
                "refresh_token": state.refresh_token,
            })));
        }

        if request.token.as_deref() != Some(state.valid_token.as_str()) {
            return Ok(fail(401, "token expired"));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let response = match (request.method, segments.as_slice()) {
            (Method::Get, ["courses"]) => ok(list_page(&state.courses, query)),
            (Method::Get, ["cpl"]) => ok(list_page(&state.outcomes, query)),
            (Method::Get, ["rps", id]) => match id.parse::<u64>() {
                Ok(id) if id == state.rps_id => {
                    let mut document = state.document.clone();
                    document["id"] = json!(id);
                    document["cpmks"] = json!(state.collections["cpmk"]);
                    document["weekly_plans"] = json!(state.collections["weekly_plan"]);
                    document["assignments"] = json!(state.collections["assignments"]);
                    document["analyses"] = json!(state.collections["analysis"]);
                    document["bibliography"] = json!(state.collections["bibliography"]);
                    document["grading_scale"] = json!(state.collections["grading_scale"]);
                    ok(document)
                }
                _ => fail(404, "rps not found"),
            },
            (Method::Put, ["rps", id]) if id.parse::<u64>() == Ok(state.rps_id) => {
                if let Some(body) = &request.body {
                    state.document = body.clone();
                }
                ok(Value::Null)
            }
            (Method::Get, ["rps", "cpmk", parent, "sub-cpmk"]) => {
                let parent: u64 = parent.parse().unwrap_or(0);
                let subs: Vec<Value> = state.collections["sub_cpmk"]
                    .iter()
                    .filter(|sub| {
                        sub["id"]
                            .as_u64()
                            .is_some_and(|id| state.sub_parents.get(&id) == Some(&parent))
                    })
                    .cloned()
                    .collect();
                ok(list_page(&subs, query))
            }
            (Method::Post, ["rps", "cpmk", parent, "sub-cpmk"]) => {
                let parent: u64 = parent.parse().unwrap_or(0);
                if !state.collections["cpmk"]
                    .iter()
                    .any(|cpmk| cpmk["id"].as_u64() == Some(parent))
                {
                    fail(404, "cpmk not found")
                } else {
                    let id = state.next_id;
                    state.next_id += 1;
                    let mut value = request.body.clone().unwrap_or_else(|| json!({}));
                    value["id"] = json!(id);
                    state.collections.get_mut("sub_cpmk").unwrap().push(value);
                    state.sub_parents.insert(id, parent);
                    ok(json!({ "id": id }))
                }
            }
            (Method::Post, ["rps", owner, segment]) if owner.parse::<u64>().is_ok() => {
                match kind_for_segment(*segment) {
                    Some(kind) if owner.parse::<u64>() == Ok(state.rps_id) => {
                        let id = state.next_id;
                        state.next_id += 1;
                        let mut value = request.body.clone().unwrap_or_else(|| json!({}));
                        value["id"] = json!(id);
                        state.collections.get_mut(kind).unwrap().push(value);
                        ok(json!({ "id": id }))
                    }
                    Some(_) => fail(404, "rps not found"),
                    None => fail(404, "unknown collection"),
                }
            }
            (Method::Put, ["rps", segment, id]) => match kind_for_segment(*segment) {
                Some(kind) => {
                    let id: u64 = id.parse().unwrap_or(0);
                    let items = state.collections.get_mut(kind).unwrap();
                    match items
                        .iter_mut()
                        .find(|item| item["id"].as_u64() == Some(id))
                    {
                        Some(item) => {
                            let mut value = request.body.clone().unwrap_or_else(|| json!({}));
                            value["id"] = json!(id);
                            *item = value;
                            ok(Value::Null)
                        }
                        None => fail(404, "entity not found"),
                    }
                }
                None => fail(404, "unknown collection"),
            },
            (Method::Delete, ["rps", segment, id]) => match kind_for_segment(*segment) {
                Some(kind) => {
                    let id: u64 = id.parse().unwrap_or(0);
                    let items = state.collections.get_mut(kind).unwrap();
                    let before = items.len();
                    items.retain(|item| item["id"].as_u64() != Some(id));
                    if items.len() == before {
                        fail(404, "entity not found")
                    } else {
                        state.sub_parents.remove(&id);
                        ok(Value::Null)
                    }
                }
                None => fail(404, "unknown collection"),
            },
            _ => fail(404, "no such route"),
        };
        Ok(response)
    }
}
