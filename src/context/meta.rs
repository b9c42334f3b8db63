use super::app::{AppRouter, AppState};
use crate::backend::{Payload, Reply};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn meta_router() -> AppRouter {
    Router::new()
        .route("/api", get(info))
        .route("/api/meta/show", post(show))
        .route("/api/meta/current", get(current_song))
        .route("/api/meta/playing", get(playing))
}

async fn info(State(app): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "title": "MPRIS remote",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": app.backend_name(),
    }))
}

async fn show(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().show().await.into()
}

async fn current_song(State(app): State<Arc<AppState>>) -> Reply {
    app.backend()
        .get_current_song()
        .await
        .map(Payload::CurrentSong)
        .into()
}

async fn playing(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().get_playing().await.map(Payload::Playing).into()
}

#[cfg(test)]
mod tests {
    use crate::context::testing::{router, send, RecordingBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn meta_routes() {
        let backend = Arc::new(RecordingBackend::default());
        let router = router(backend.clone(), None);

        let (status, body) = send(&router, Method::POST, "/api/meta/show", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": true }));

        let (_, body) = send(&router, Method::GET, "/api/meta/current", None, None).await;
        assert_eq!(
            body,
            json!({ "status": true, "current_song": { "title": "Song", "artist": ["A"] } })
        );

        let (_, body) = send(&router, Method::GET, "/api/meta/playing", None, None).await;
        assert_eq!(body, json!({ "status": true, "playing": false }));

        assert_eq!(backend.calls(), ["show", "get_current_song", "get_playing"]);
    }

    #[tokio::test]
    async fn service_info() {
        let router = router(Arc::new(RecordingBackend::default()), None);
        let (status, body) = send(&router, Method::GET, "/api", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "recording");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn failures_carry_no_payload() {
        let router = router(Arc::new(RecordingBackend::failing()), None);
        let (status, body) = send(&router, Method::GET, "/api/meta/current", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("current_song").is_none());
        assert_eq!(body["status"], false);
    }
}
