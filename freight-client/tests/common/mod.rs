//! In-process mock of the load-board API

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use freight_client::{DataAccess, HttpClient, RouterTransport, Session};

pub const VALID_TOKEN: &str = "tok-valid";
pub const EXPIRED_TOKEN: &str = "tok-expired";

pub fn users_body() -> Value {
    json!({
        "success": true,
        "code": 200,
        "message": "OK",
        "data": [
            {"_id": "1", "firstName": "A"},
            {"_id": "2", "firstName": "B", "role": "dispatcher", "teamId": "t-3"}
        ],
        "meta": {"page": 1, "limit": 10, "totalPages": 1, "totalItems": 2}
    })
}

#[derive(Debug, Default)]
pub struct MockState {
    /// Every request that reached the server
    pub hits: AtomicUsize,
    pub last_query: Mutex<Option<String>>,
    pub last_body: Mutex<Option<Value>>,
    pub quotes: Mutex<BTreeMap<String, Value>>,
}

impl MockState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

fn ok(data: Value) -> Response {
    Json(json!({"success": true, "code": 200, "message": "OK", "data": data})).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"success": false, "code": status.as_u16(), "message": message})),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn list_users(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Json<Value> {
    state.hit();
    *state.last_query.lock().unwrap() = query;
    Json(users_body())
}

async fn list_loads(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    // Give concurrent callers time to be in flight together
    tokio::time::sleep(Duration::from_millis(20)).await;
    match bearer(&headers) {
        Some(VALID_TOKEN) => ok(json!([])),
        _ => fail(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn get_load(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.hit();
    match id.as_str() {
        "missing" => fail(StatusCode::NOT_FOUND, "Load not found"),
        // Proxy error page, no JSON body
        "broken" => (StatusCode::BAD_GATEWAY, "<html>502</html>").into_response(),
        _ => ok(json!({
            "_id": id,
            "loadNumber": "LB-1001",
            "brokerId": "b-1",
            "origin": {"city": "Dallas", "state": "TX"},
            "destination": {"city": "Denver", "state": "CO"},
            "pickupDate": "2026-11-02",
            "equipmentType": "dry van",
            "status": "posted"
        })),
    }
}

async fn update_status(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    *state.last_body.lock().unwrap() = Some(body.clone());
    ok(json!({
        "_id": id,
        "loadNumber": "LB-1001",
        "brokerId": "b-1",
        "origin": {"city": "Dallas", "state": "TX"},
        "destination": {"city": "Denver", "state": "CO"},
        "pickupDate": "2026-11-02",
        "equipmentType": "dry van",
        "status": body["status"]
    }))
}

async fn create_quote(State(state): State<Arc<MockState>>, Json(mut body): Json<Value>) -> Response {
    state.hit();
    *state.last_body.lock().unwrap() = Some(body.clone());
    let mut quotes = state.quotes.lock().unwrap();
    let id = format!("q-{}", quotes.len() + 1);
    body["_id"] = json!(id);
    body["status"] = json!("pending");
    quotes.insert(id, body.clone());
    ok(body)
}

async fn update_quote(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    *state.last_body.lock().unwrap() = Some(body.clone());
    let mut quotes = state.quotes.lock().unwrap();
    let Some(quote) = quotes.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "Quote not found");
    };
    if let (Some(stored), Some(changes)) = (quote.as_object_mut(), body.as_object()) {
        stored.extend(changes.clone());
    }
    ok(quote.clone())
}

async fn delete_quote(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.hit();
    match state.quotes.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => fail(StatusCode::NOT_FOUND, "Quote not found"),
    }
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hit();
    if body["password"] == "hunter22" {
        ok(json!({
            "token": VALID_TOKEN,
            "user": {"_id": "u-1", "firstName": "Dana", "email": body["email"], "role": "broker"}
        }))
    } else {
        fail(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    match bearer(&headers) {
        Some(VALID_TOKEN) => ok(Value::Null),
        _ => fail(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn broker_stats(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    ok(json!({"totalLoads": 12, "postedLoads": 5, "totalCarriers": 3, "totalRevenue": 18250.0}))
}

async fn request_load(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.hit();
    ok(json!({"_id": id, "carrierId": "c-1", "status": "requested"}))
}

async fn load_action(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    ok(json!({"acknowledged": true}))
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/user", get(list_users))
        .route("/api/load", get(list_loads))
        .route("/api/load/{id}", get(get_load))
        .route("/api/load/{id}/status", put(update_status))
        .route("/api/load/request/{id}", post(request_load))
        .route("/api/load/rateconfirm/{id}", post(load_action))
        .route("/api/load/create-alert", post(load_action))
        .route("/api/load/refresh-age", post(load_action))
        .route("/api/quote", post(create_quote))
        .route("/api/quote/{id}", put(update_quote).delete(delete_quote))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/dashboard/broker-dashboard-board-stats", get(broker_stats))
        .with_state(state)
}

/// Data access wired to a fresh mock server
pub fn setup(session: Session) -> (DataAccess, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let http = HttpClient::with_transport(
        "http://loadboard.test/api",
        RouterTransport::new(router(state.clone())),
        session,
    );
    (DataAccess::new(http), state)
}
