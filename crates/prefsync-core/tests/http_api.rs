//! End-to-end tests of the reqwest client and sync manager against a local
//! axum server that mimics the preferences endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use prefsync_core::api::{HttpPreferenceApi, SearchPreferences};
use prefsync_core::models::is_local_id;
use prefsync_core::storage::queue::PENDING_QUEUE_KEY;
use prefsync_core::storage::{FileStore, KeyValueStore};
use prefsync_core::{PreferenceDraft, PreferenceSyncManager, SaveOutcome};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Clone, Default)]
struct Backend {
    online: Arc<AtomicBool>,
    upserts: Arc<Mutex<Vec<Value>>>,
}

async fn upsert(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.upserts.lock().unwrap().push(body.clone());
    if !backend.online.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "D1_ERROR: database unavailable" })),
        )
            .into_response();
    }
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("pref-1")
        .to_string();
    Json(json!({ "id": id, "text": body["text"] })).into_response()
}

async fn remove(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    }
    Json(json!({ "deleted": id })).into_response()
}

async fn search(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "results": [{ "id": "p1", "query": body["query"], "topK": body["topK"] }] }))
}

async fn list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "results": [{ "id": "p1", "userId": params.get("userId") }] }))
}

async fn spawn_backend(backend: Backend) -> SocketAddr {
    let app = Router::new()
        .route("/api/preferences/upsert", post(upsert))
        .route("/api/preferences/delete/{id}", delete(remove))
        .route("/api/preferences/search", post(search))
        .route("/api/preferences/list", get(list))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn offline_save_is_queued_then_flushed_when_backend_recovers() {
    let backend = Backend::default();
    let addr = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let api = HttpPreferenceApi::new(format!("http://{addr}/")).unwrap();
    let manager = PreferenceSyncManager::new(api, store);

    let report = manager
        .save_preference(&PreferenceDraft::new("remote rust roles").with_name("remote"))
        .await;
    let Ok(SaveOutcome::SavedLocally { id }) = &report.result else {
        panic!("expected local save, got {:?}", report.result);
    };
    assert!(is_local_id(id));
    assert!(report.error.unwrap().contains("D1_ERROR"));
    assert!(manager.store().get(PENDING_QUEUE_KEY).unwrap().is_some());

    backend.online.store(true, Ordering::SeqCst);
    let sync = manager.flush_pending().await.unwrap();

    assert_eq!(sync.synced, 1);
    assert_eq!(manager.store().get(PENDING_QUEUE_KEY).unwrap(), None);
    let upserts = backend.upserts.lock().unwrap().clone();
    assert_eq!(upserts.len(), 2);
    assert_eq!(upserts[0], json!({ "name": "remote", "text": "remote rust roles" }));
    assert_eq!(
        upserts[1],
        json!({
            "id": id,
            "userId": "public",
            "name": "remote",
            "text": "remote rust roles",
            "metadata": null,
        })
    );
}

#[tokio::test]
async fn online_save_returns_server_payload() {
    let backend = Backend::default();
    backend.online.store(true, Ordering::SeqCst);
    let addr = spawn_backend(backend).await;
    let dir = tempfile::tempdir().unwrap();
    let manager = PreferenceSyncManager::new(
        HttpPreferenceApi::new(format!("http://{addr}")).unwrap(),
        FileStore::open(dir.path()).unwrap(),
    );

    let report = manager.save_preference(&PreferenceDraft::new("x")).await;

    assert_eq!(
        report.result,
        Ok(SaveOutcome::Saved(json!({ "id": "pref-1", "text": "x" })))
    );
    assert_eq!(report.error, None);
}

#[tokio::test]
async fn delete_encodes_id_and_surfaces_not_found() {
    let addr = spawn_backend(Backend::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let manager = PreferenceSyncManager::new(
        HttpPreferenceApi::new(format!("http://{addr}")).unwrap(),
        FileStore::open(dir.path()).unwrap(),
    );

    let deleted = manager.delete_preference("a b/c").await;
    let missing = manager.delete_preference("missing").await;

    assert_eq!(deleted.result, Ok(Some(json!({ "deleted": "a b/c" }))));
    let failure = missing.result.unwrap_err();
    assert_eq!(failure.status, Some(404));
    assert_eq!(failure.error, "Not found");
}

#[tokio::test]
async fn search_and_list_send_expected_parameters() {
    let addr = spawn_backend(Backend::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let manager = PreferenceSyncManager::new(
        HttpPreferenceApi::new(format!("http://{addr}")).unwrap(),
        FileStore::open(dir.path()).unwrap(),
    );

    let searched = manager
        .search_preferences(&SearchPreferences::new("rust").with_top_k(3))
        .await;
    let listed = manager.list_preferences(Some("alice")).await;
    let listed_all = manager.list_preferences(None).await;

    assert_eq!(
        searched.result,
        Ok(vec![json!({ "id": "p1", "query": "rust", "topK": 3 })])
    );
    assert_eq!(
        listed.result,
        Ok(vec![json!({ "id": "p1", "userId": "alice" })])
    );
    assert_eq!(
        listed_all.result,
        Ok(vec![json!({ "id": "p1", "userId": null })])
    );
}

#[tokio::test]
async fn unreachable_backend_is_reported_without_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let dir = tempfile::tempdir().unwrap();
    let manager = PreferenceSyncManager::new(
        HttpPreferenceApi::new(format!("http://{addr}")).unwrap(),
        FileStore::open(dir.path()).unwrap(),
    );

    let report = manager.save_preference(&PreferenceDraft::new("x")).await;

    let failure = report.result.unwrap_err();
    assert_eq!(failure.status, None);
    assert!(failure.error.starts_with("HTTP request failed"));
    assert!(manager.pending().unwrap().is_empty());
}

#[tokio::test]
async fn truncated_body_is_reported_as_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0_u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\n{\"results\":")
            .await
            .unwrap();
    });
    let dir = tempfile::tempdir().unwrap();
    let manager = PreferenceSyncManager::new(
        HttpPreferenceApi::new(format!("http://{addr}")).unwrap(),
        FileStore::open(dir.path()).unwrap(),
    );

    let report = manager.list_preferences(None).await;

    let failure = report.result.unwrap_err();
    assert_eq!(failure.status, None);
    assert!(
        failure
            .error
            .starts_with("Transport error: failed to read response body"),
        "{}",
        failure.error
    );
}
