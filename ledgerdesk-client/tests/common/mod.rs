//! Shared helpers: an in-process mock of the ledger backend

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use ledgerdesk_client::{
    ApiClientConfig, Gateway, LedgerApi, MemoryStore, RecordingNavigator, SessionManager,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const ADMIN_UUID: &str = "5b1c0c2e-7a43-4c8e-a1f1-admin";
pub const VALID_TOKEN: &str = "tok-valid";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockState {
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockState {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push(SeenRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });
    next.run(request).await
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {VALID_TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

pub fn user_json(id: i64, first: &str, active: bool) -> Value {
    json!({
        "id": id,
        "uuid": format!("user-{id}"),
        "first_name": first,
        "last_name": "Patil",
        "mobile": "9876543210",
        "location": "Nashik",
        "is_active": active,
        "created_date": "2024-05-01T10:00:00",
        "updated_date": "2024-05-02T10:00:00.123456"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["name"] == "admin" && body["password"] == "secret" {
        Json(json!({
            "access_token": VALID_TOKEN,
            "token_type": "bearer",
            "admin": {"id": 1, "name": "admin", "uuid": ADMIN_UUID, "created_date": "2024-05-01T10:00:00"}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["name"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Admin name already exists"})),
        )
            .into_response();
    }
    Json(json!({"id": 2, "name": body["name"], "uuid": "new-admin", "created_date": "2024-05-01T10:00:00"}))
        .into_response()
}

async fn list_users(headers: HeaderMap, Path(_admin): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([user_json(1, "Ravi", true), user_json(2, "Sunil", false)])).into_response()
}

async fn add_user(headers: HeaderMap, Path(_admin): Path<String>, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mobile = body["mobile"].as_str().unwrap_or_default();
    if mobile.len() != 10 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "mobile"], "msg": "String should match pattern"}]})),
        )
            .into_response();
    }
    if mobile == "0000000000" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Mobile number already registered"})),
        )
            .into_response();
    }
    Json(user_json(3, body["first_name"].as_str().unwrap_or_default(), true)).into_response()
}

async fn set_status(
    headers: HeaderMap,
    Path((_admin, id, action)): Path<(String, i64, String)>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(user_json(id, "Ravi", action == "enable")).into_response()
}

async fn garbage(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, "<html>oops</html>").into_response()
}

pub async fn spawn_backend() -> MockBackend {
    let state = MockState::default();

    let app = Router::new()
        .route("/api/login_admin", post(login))
        .route("/api/register_admin", post(register))
        .route("/api/admin/{admin}/users", get(list_users))
        .route("/api/admin/{admin}/add_user", post(add_user))
        .route("/api/admin/{admin}/user/{id}/{action}", put(set_status))
        .route("/api/garbage", get(garbage))
        .layer(middleware::from_fn_with_state(state.clone(), record));

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

pub struct TestClient {
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: Arc<SessionManager>,
    pub api: LedgerApi,
}

pub fn client_for(base_url: &str, store: MemoryStore) -> TestClient {
    let store = Arc::new(store);
    let navigator = Arc::new(RecordingNavigator::new());
    let session = Arc::new(SessionManager::new(store.clone(), navigator.clone()));
    let gateway = Gateway::new(ApiClientConfig::new(base_url), session.clone()).unwrap();
    TestClient {
        store,
        navigator,
        session,
        api: LedgerApi::new(gateway),
    }
}

pub fn signed_in_store(token: &str) -> MemoryStore {
    let admin = json!({"uuid": ADMIN_UUID, "name": "admin"}).to_string();
    MemoryStore::with_entries(&[("token", token), ("adminInfo", admin.as_str())])
}
