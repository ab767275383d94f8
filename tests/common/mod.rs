use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use schooldesk::backend::{BearerToken, FetchError, HttpPermissionSource, PermissionSource};
use schooldesk::session::AccessSession;
use schooldesk::store::PermissionStore;
use schooldesk_cache::{KeyValueStore, PermissionCache};
use schooldesk_config::ApiConfig;
use schooldesk_models::{Identity, PermissionsResponse, Role, SidebarItem, UserId};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Well-known test accounts.
#[allow(dead_code)]
pub mod accounts {
    use super::*;

    pub fn director() -> Identity {
        Identity::new(UserId::from_u128(1), Role::Director).with_name("Test Director")
    }

    pub fn head_teacher() -> Identity {
        Identity::new(UserId::from_u128(2), Role::HeadTeacher).with_name("Test Head")
    }

    pub fn class_teacher() -> Identity {
        Identity::new(UserId::from_u128(3), Role::ClassTeacher).with_name("Test Teacher")
    }

    pub fn bursar() -> Identity {
        Identity::new(UserId::from_u128(4), Role::Bursar).with_name("Test Bursar")
    }
}

/// Builds a backend response body.
#[allow(dead_code)]
pub fn permissions_body(permissions: &[&str], modules: &[&str]) -> Value {
    json!({
        "permissions": permissions,
        "sidebar": modules
            .iter()
            .map(|m| json!({ "module": m, "label": m.to_uppercase() }))
            .collect::<Vec<_>>(),
    })
}

#[derive(Default)]
struct BackendState {
    reply: Mutex<Option<(StatusCode, Value)>>,
    authorization: Mutex<Vec<Option<String>>>,
}

/// In-process stand-in for the REST backend, serving
/// `GET /api/auth/my-permissions`.
#[allow(dead_code)]
pub struct TestBackend {
    pub api: ApiConfig,
    state: Arc<BackendState>,
}

#[allow(dead_code)]
impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/auth/my-permissions", get(my_permissions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api: ApiConfig::new(format!("http://{}/api", addr)),
            state,
        }
    }

    pub fn respond(&self, status: StatusCode, body: Value) {
        *self.state.reply.lock().unwrap() = Some((status, body));
    }

    pub fn grant(&self, permissions: &[&str], modules: &[&str]) {
        self.respond(StatusCode::OK, permissions_body(permissions, modules));
    }

    pub fn fail(&self) {
        self.respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "database unavailable" }),
        );
    }

    /// Authorization headers seen so far, in request order.
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }
}

async fn my_permissions(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorization.lock().unwrap().push(auth.clone());

    if auth.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing authorization header" })),
        );
    }

    let reply = state.reply.lock().unwrap().clone();
    match reply {
        Some((status, body)) => (status, Json(body)),
        None => (StatusCode::OK, Json(permissions_body(&[], &[]))),
    }
}

/// Session wired to a [`TestBackend`] through the real HTTP client.
#[allow(dead_code)]
pub fn http_session(
    backend: &TestBackend,
    kv: Arc<dyn KeyValueStore>,
) -> AccessSession<HttpPermissionSource> {
    let token = BearerToken::new();
    let source = HttpPermissionSource::new(&backend.api, token.clone()).unwrap();
    let store = PermissionStore::new(source, PermissionCache::new(kv, "test"));
    AccessSession::new(store).with_credentials(token)
}

/// Source whose fetches block until released, replaying scripted responses
/// in call order.
#[allow(dead_code)]
pub struct GatedSource {
    responses: Mutex<VecDeque<PermissionsResponse>>,
    release: Semaphore,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            release: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, permissions: &[&str], modules: &[&str]) {
        self.responses.lock().unwrap().push_back(PermissionsResponse {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            sidebar: modules.iter().map(|m| SidebarItem::new(*m)).collect(),
        });
    }

    pub fn release_one(&self) {
        self.release.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yields until `n` fetches have started.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

impl PermissionSource for GatedSource {
    async fn fetch_permissions(&self) -> Result<PermissionsResponse, FetchError> {
        let response = self.responses.lock().unwrap().pop_front().unwrap_or_default();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.acquire().await.unwrap().forget();
        Ok(response)
    }
}
