#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};

// ============================================================================
// In-process Kubernetes API server mock
// ============================================================================

#[derive(Default)]
struct ApiState {
    pods: HashMap<String, Value>,
    /// Phases reported by successive pod GETs; the last one repeats.
    phases: Vec<String>,
    services: HashMap<String, Value>,
    put_conflicts: u32,
    next_ip: u8,
    requests: Vec<String>,
    tokens: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockApiServer {
    state: Arc<RwLock<ApiState>>,
}

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

fn status(code: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        code,
        Json(json!({ "kind": "Status", "code": code.as_u16(), "message": message })),
    )
}

impl MockApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves on an ephemeral port; dropping the sender stops the server.
    pub async fn start(&self) -> (SocketAddr, oneshot::Sender<()>) {
        let app = Router::new()
            .route(
                "/api/v1/namespaces/{ns}/pods",
                axum::routing::post(create_pod),
            )
            .route(
                "/api/v1/namespaces/{ns}/pods/{name}",
                get(get_pod).delete(delete_pod),
            )
            .route(
                "/api/v1/namespaces/{ns}/services",
                axum::routing::post(create_service),
            )
            .route(
                "/api/v1/namespaces/{ns}/services/{name}",
                get(get_service).put(replace_service).delete(delete_service),
            )
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });
        (addr, shutdown_tx)
    }

    pub async fn set_phases(&self, phases: &[&str]) {
        self.state.write().await.phases = phases.iter().map(|p| p.to_string()).collect();
    }

    pub async fn set_put_conflicts(&self, count: u32) {
        self.state.write().await.put_conflicts = count;
    }

    pub async fn insert_service(&self, service: Value) {
        let name = service["metadata"]["name"].as_str().unwrap().to_string();
        self.state.write().await.services.insert(name, service);
    }

    pub async fn pod(&self, name: &str) -> Option<Value> {
        self.state.read().await.pods.get(name).cloned()
    }

    pub async fn service(&self, name: &str) -> Option<Value> {
        self.state.read().await.services.get(name).cloned()
    }

    pub async fn requests(&self) -> Vec<String> {
        self.state.read().await.requests.clone()
    }

    pub async fn tokens(&self) -> Vec<String> {
        self.state.read().await.tokens.clone()
    }

    async fn log(&self, line: String, headers: &HeaderMap) {
        let mut state = self.state.write().await;
        state.requests.push(line);
        if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            state.tokens.push(auth.to_string());
        }
    }
}

// ============================================================================
// Pods
// ============================================================================

async fn create_pod(
    State(api): State<MockApiServer>,
    Path(ns): Path<String>,
    headers: HeaderMap,
    Json(pod): Json<Value>,
) -> ApiResult {
    api.log(format!("POST pods {}", ns), &headers).await;
    let name = pod["metadata"]["name"].as_str().unwrap_or_default().to_string();
    let mut state = api.state.write().await;
    if state.pods.contains_key(&name) {
        return Err(status(StatusCode::CONFLICT, "pods already exists"));
    }
    state.pods.insert(name, pod.clone());
    Ok((StatusCode::CREATED, Json(pod)))
}

async fn get_pod(
    State(api): State<MockApiServer>,
    Path((_ns, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    api.log(format!("GET pod {}", name), &headers).await;
    let mut state = api.state.write().await;
    let phase = if state.phases.len() > 1 {
        state.phases.remove(0)
    } else {
        state.phases.first().cloned().unwrap_or_else(|| "Pending".to_string())
    };
    let Some(pod) = state.pods.get(&name) else {
        return Err(status(StatusCode::NOT_FOUND, "pod not found"));
    };
    let mut pod = pod.clone();
    pod["status"] = json!({ "phase": phase });
    Ok((StatusCode::OK, Json(pod)))
}

async fn delete_pod(
    State(api): State<MockApiServer>,
    Path((_ns, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    api.log(format!("DELETE pod {}", name), &headers).await;
    match api.state.write().await.pods.remove(&name) {
        Some(pod) => Ok((StatusCode::OK, Json(pod))),
        None => Err(status(StatusCode::NOT_FOUND, "pod not found")),
    }
}

// ============================================================================
// Services
// ============================================================================

async fn create_service(
    State(api): State<MockApiServer>,
    Path(_ns): Path<String>,
    headers: HeaderMap,
    Json(mut service): Json<Value>,
) -> ApiResult {
    api.log("POST service".to_string(), &headers).await;
    let name = service["metadata"]["name"].as_str().unwrap_or_default().to_string();
    let mut state = api.state.write().await;
    if state.services.contains_key(&name) {
        return Err(status(StatusCode::CONFLICT, "services already exists"));
    }
    if service["spec"]["type"] == "ClusterIP" && service["spec"].get("clusterIP").is_none() {
        state.next_ip += 1;
        service["spec"]["clusterIP"] = json!(format!("10.96.0.{}", state.next_ip));
    }
    service["metadata"]["resourceVersion"] = json!("1");
    state.services.insert(name, service.clone());
    Ok((StatusCode::CREATED, Json(service)))
}

async fn get_service(
    State(api): State<MockApiServer>,
    Path((_ns, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    api.log(format!("GET service {}", name), &headers).await;
    api.state
        .read()
        .await
        .services
        .get(&name)
        .cloned()
        .map(|s| (StatusCode::OK, Json(s)))
        .ok_or_else(|| status(StatusCode::NOT_FOUND, "services not found"))
}

async fn replace_service(
    State(api): State<MockApiServer>,
    Path((_ns, name)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut service): Json<Value>,
) -> ApiResult {
    api.log(format!("PUT service {}", name), &headers).await;
    let mut state = api.state.write().await;
    if state.put_conflicts > 0 {
        state.put_conflicts -= 1;
        return Err(status(
            StatusCode::CONFLICT,
            "the object has been modified; please apply your changes to the latest version",
        ));
    }
    if !state.services.contains_key(&name) {
        return Err(status(StatusCode::NOT_FOUND, "services not found"));
    }
    if service["spec"]["type"] == "ClusterIP" && service["spec"].get("clusterIP").is_none() {
        state.next_ip += 1;
        service["spec"]["clusterIP"] = json!(format!("10.96.0.{}", state.next_ip));
    }
    state.services.insert(name, service.clone());
    Ok((StatusCode::OK, Json(service)))
}

async fn delete_service(
    State(api): State<MockApiServer>,
    Path((_ns, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult {
    api.log(format!("DELETE service {}", name), &headers).await;
    match api.state.write().await.services.remove(&name) {
        Some(service) => Ok((StatusCode::OK, Json(service))),
        None => Err(status(StatusCode::NOT_FOUND, "services not found")),
    }
}
