use super::app::{AppRouter, AppState};
use crate::backend::Reply;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn player_router() -> AppRouter {
    Router::new()
        .route("/api/player/play", post(play))
        .route("/api/player/pause", post(pause))
        .route("/api/player/playpause", post(play_pause))
        .route("/api/player/stop", post(stop))
        .route("/api/player/next", post(next))
        .route("/api/player/prev", post(prev))
        .route("/api/player/seek", post(seek))
}

async fn play(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().play().await.into()
}

async fn pause(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().pause().await.into()
}

async fn play_pause(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().toggle_play_pause().await.into()
}

async fn stop(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().stop().await.into()
}

async fn next(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().skip().await.into()
}

async fn prev(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().prev().await.into()
}

#[derive(Deserialize)]
struct SeekArgs {
    /// Negative to seek backward.
    seconds: i64,
}

async fn seek(
    State(app): State<Arc<AppState>>,
    Json(SeekArgs { seconds }): Json<SeekArgs>,
) -> Reply {
    app.backend().seek(seconds).await.into()
}
