//! Shared test harness: a scriptable ledger backend and a wired-up console

#![allow(dead_code)]

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use ledgerdesk_client::{MemoryStore, RecordingNavigator};
use ledgerdesk_console::{ConsoleContext, RecordingView};
use ledgerdesk_core::ConsoleConfig;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const ADMIN_UUID: &str = "9d3f61aa-admin";
pub const VALID_TOKEN: &str = "tok-valid";

/// What the fake backend should answer.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub users: i64,
    pub clients: i64,
    /// Rows whose metrics request answers 500
    pub failing_metrics: HashSet<i64>,
    /// Rows whose metrics request answers 401
    pub expired_metrics: HashSet<i64>,
    /// Make the pending-total endpoints fail with 500
    pub pending_fails: bool,
}

#[derive(Clone)]
pub struct MockState {
    script: Arc<Script>,
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockState {
    /// `(method, path)` of every request, in arrival order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path_suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, p)| m == method && p.ends_with(path_suffix))
            .count()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state
        .seen
        .lock()
        .unwrap()
        .push((request.method().to_string(), request.uri().path().to_string()));
    next.run(request).await
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn reject() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

pub fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "uuid": format!("user-{id}"),
        "first_name": format!("User{id}"),
        "last_name": "Patil",
        "mobile": format!("98765432{:02}", id),
        "location": "Nashik",
        "is_active": id % 2 == 1,
        "created_date": "2026-10-01T08:00:00",
        "updated_date": "2026-10-01T08:00:00"
    })
}

pub fn client_json(id: i64) -> Value {
    json!({
        "id": id,
        "uuid": format!("client-{id}"),
        "name": format!("Client{id}"),
        "username": format!("client{id}"),
        "location": "Pune",
        "phone_number": format!("90000000{:02}", id),
        "created_date": "2026-10-02T08:00:00",
        "updated_date": "2026-10-02T08:00:00"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["name"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("secret")) => Json(json!({
            "access_token": VALID_TOKEN,
            "token_type": "bearer",
            "admin": {"id": 1, "name": "admin", "uuid": ADMIN_UUID, "created_date": "2026-10-01T08:00:00"}
        }))
        .into_response(),
        // A 2xx that forgot the token must not open a session
        (Some("tokenless"), _) => Json(json!({
            "token_type": "bearer",
            "admin": {"id": 3, "name": "tokenless", "uuid": "x", "created_date": "2026-10-01T08:00:00"}
        }))
        .into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["name"] == "admin" {
        return error(StatusCode::BAD_REQUEST, "Admin name already exists");
    }
    Json(json!({"id": 2, "name": body["name"], "uuid": "new-admin", "created_date": "2026-10-16T08:00:00"}))
        .into_response()
}

async fn dashboard(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    let recent_users: Vec<Value> = (1..=state.script.users.min(5)).map(user_json).collect();
    Json(json!({
        "admin_name": "admin",
        "total_users": state.script.users,
        "active_users": (state.script.users + 1) / 2,
        "total_clients": state.script.clients,
        "users_pending_amount": 123456.0,
        "clients_pending_amount": 2500.5,
        "recent_users": recent_users,
        "recent_clients": []
    }))
    .into_response()
}

async fn list_users(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    Json((1..=state.script.users).map(user_json).collect::<Vec<_>>()).into_response()
}

async fn list_clients(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    Json((1..=state.script.clients).map(client_json).collect::<Vec<_>>()).into_response()
}

async fn pending(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    if state.script.pending_fails {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({"total_pending": 4200.0, "details": []})).into_response()
}

async fn metrics(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path((_admin, entity, id)): Path<(String, String, i64)>,
) -> Response {
    if !authorized(&headers) {
        return reject();
    }

    // Earlier rows answer last so completion order differs from list order
    let total = state.script.users.max(state.script.clients);
    let delay = (total - id).max(0) as u64 * 15;
    tokio::time::sleep(Duration::from_millis(delay)).await;

    if state.script.expired_metrics.contains(&id) {
        return reject();
    }
    if state.script.failing_metrics.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let value = id as f64 * 100.0;
    match entity.as_str() {
        "user" => Json(json!({
            "user_id": id,
            "user_name": format!("User{id} Patil"),
            "total_debit": value,
            "total_credit": 0.0,
            "sum_deficit": value,
            "status": "Deficit"
        }))
        .into_response(),
        _ => Json(json!({
            "client_id": id,
            "client_name": format!("Client{id}"),
            "total_debit": value,
            "total_credit": 0.0,
            "profit_loss_total": value,
            "pending_amount": value,
            "status": "Profit"
        }))
        .into_response(),
    }
}

async fn add_user(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    if body["mobile"] == "0000000000" {
        return error(StatusCode::BAD_REQUEST, "Mobile number already registered");
    }
    Json(user_json(99)).into_response()
}

async fn add_client(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    Json(client_json(99)).into_response()
}

async fn add_record(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    if body["transaction_type"] == "credit" && body["credit_amount"].as_f64() == Some(0.0) {
        return error(StatusCode::BAD_REQUEST, "Amount must be positive");
    }
    Json(json!({"message": "Record added"})).into_response()
}

async fn record_details(
    headers: HeaderMap,
    Path((_admin, entity, id)): Path<(String, String, i64)>,
) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    match entity.as_str() {
        "user" => Json(json!({
            "user_id": id,
            "user_name": format!("User{id} Patil"),
            "credit_records": [{"id": 1, "date": "2026-10-03T09:00:00", "amount": 500.0, "round_off": 0.5}],
            "debit_records": [],
            "total_credits": 1,
            "total_debits": 0
        }))
        .into_response(),
        _ => Json(json!({
            "client_id": id,
            "client_name": format!("Client{id}"),
            "credit_records": [],
            "debit_records": [{"id": 2, "date": "2026-10-04T09:00:00", "transaction_type": "debit", "amount": 800.0}],
            "profit_loss_records": [{"id": 3, "date": "2026-10-04T09:00:00", "amount": -50.0, "type": "Loss"}],
            "total_credits": 0,
            "total_debits": 1,
            "total_profit_loss_entries": 1
        }))
        .into_response(),
    }
}

async fn user_panel(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    let entries: Vec<Value> = (1..=state.script.users)
        .map(|id| json!({"id": id, "uuid": format!("user-{id}"), "name": format!("User{id} Patil"), "is_active": true}))
        .collect();
    Json(entries).into_response()
}

async fn client_panel(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    let entries: Vec<Value> = (1..=state.script.clients)
        .map(|id| json!({"id": id, "uuid": format!("client-{id}"), "name": format!("Client{id}"), "username": format!("client{id}"), "pending_amount": 10.0}))
        .collect();
    Json(entries).into_response()
}

async fn entity_put(
    headers: HeaderMap,
    Path((_admin, entity, id, action)): Path<(String, String, i64, String)>,
) -> Response {
    if !authorized(&headers) {
        return reject();
    }
    match (entity.as_str(), action.as_str()) {
        ("user", "enable" | "disable") => {
            let mut user = user_json(id);
            user["is_active"] = json!(action == "enable");
            Json(user).into_response()
        }
        ("client", "update") => {
            let mut client = client_json(id);
            client["location"] = json!("Mumbai");
            Json(client).into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

pub async fn spawn_backend(script: Script) -> MockBackend {
    let state = MockState {
        script: Arc::new(script),
        seen: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/api/login_admin", post(login))
        .route("/api/register_admin", post(register))
        .route("/api/dashboard/{admin}", get(dashboard))
        .route("/api/admin/{admin}/users", get(list_users))
        .route("/api/admin/{admin}/clients", get(list_clients))
        .route("/api/admin/{admin}/final_users_pending_amount", get(pending))
        .route("/api/admin/{admin}/final_clients_pending_amount", get(pending))
        .route("/api/admin/{admin}/user_panel_names", get(user_panel))
        .route("/api/admin/{admin}/client_panel_names", get(client_panel))
        .route("/api/admin/{admin}/add_user", post(add_user))
        .route("/api/admin/{admin}/add_client", post(add_client))
        .route(
            "/api/admin/{admin}/{entity}/{id}/calculate_record_details",
            get(metrics),
        )
        .route("/api/admin/{admin}/{entity}/{id}/add_record", post(add_record))
        .route(
            "/api/admin/{admin}/{entity}/{id}/record_details",
            get(record_details),
        )
        .route("/api/admin/{admin}/{entity}/{id}/{action}", put(entity_put))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{address}/api"),
        state,
    }
}

pub struct TestConsole {
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub view: Arc<RecordingView>,
    pub ctx: ConsoleContext,
}

pub fn console_with_view(base_url: &str, store: MemoryStore, view: RecordingView) -> TestConsole {
    let mut config = ConsoleConfig::default();
    config.api.base_url = base_url.to_string();

    let store = Arc::new(store);
    let navigator = Arc::new(RecordingNavigator::new());
    let view = Arc::new(view);
    let ctx = ConsoleContext::new(config, store.clone(), navigator.clone(), view.clone()).unwrap();

    TestConsole {
        store,
        navigator,
        view,
        ctx,
    }
}

pub fn console_for(base_url: &str, store: MemoryStore) -> TestConsole {
    console_with_view(base_url, store, RecordingView::new())
}

pub fn signed_in(token: &str) -> MemoryStore {
    let admin = json!({"uuid": ADMIN_UUID, "name": "admin"}).to_string();
    MemoryStore::with_entries(&[("token", token), ("adminInfo", admin.as_str())])
}
