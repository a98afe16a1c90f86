use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::store::{StoreError, Task, TaskStore};

/// One mutation at a time: every handler goes through this lock, which keeps
/// the id-contiguity rule intact under concurrent requests.
pub type SharedStore = Arc<Mutex<TaskStore>>;

#[derive(Deserialize)]
struct TitleRequest {
    title: String,
}

pub async fn start_server(store: SharedStore, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/api/tasks", get(list_tasks).post(add_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/done", post(done_task))
        .fallback_service(ServeDir::new("ui"))
        .with_state(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🌐 Ticklist is running at: http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn list_tasks(State(store): State<SharedStore>) -> Json<Vec<Task>> {
    let store = store.lock().await;
    Json(store.all().to_vec())
}

async fn get_task(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, (StatusCode, &'static str)> {
    let store = store.lock().await;
    match store.find(id) {
        Some(task) => Ok(Json(task.clone())),
        None => Err((StatusCode::NOT_FOUND, "Task not found")),
    }
}

async fn add_task(
    State(store): State<SharedStore>,
    Json(req): Json<TitleRequest>,
) -> Json<serde_json::Value> {
    let mut store = store.lock().await;
    match store.add(&req.title) {
        Ok(task) => Json(serde_json::json!({"status": "success", "task": task})),
        Err(StoreError::InvalidTitle) => {
            Json(serde_json::json!({"status": "error", "message": "Title cannot be empty."}))
        }
    }
}

async fn done_task(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
) -> Json<serde_json::Value> {
    let mut store = store.lock().await;
    if store.mark_done(id) {
        Json(serde_json::json!({"status": "success"}))
    } else {
        Json(serde_json::json!({"status": "error", "message": "Task not found or already done."}))
    }
}

async fn delete_task(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
) -> Json<serde_json::Value> {
    let mut store = store.lock().await;
    if store.delete(id) {
        Json(serde_json::json!({"status": "success"}))
    } else {
        Json(serde_json::json!({"status": "error", "message": "Task not found."}))
    }
}

async fn update_task(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
    Json(req): Json<TitleRequest>,
) -> Json<serde_json::Value> {
    let mut store = store.lock().await;
    if store.edit(id, &req.title) {
        Json(serde_json::json!({"status": "success"}))
    } else {
        Json(serde_json::json!({"status": "error", "message": "Invalid title or task not found."}))
    }
}
