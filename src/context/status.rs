use super::{
    app::{AppRouter, AppState},
    RequestError,
};
use crate::backend::{LoopMode, Payload, Reply};
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn status_router() -> AppRouter {
    Router::new()
        .route("/api/status/position", get(get_position).post(set_position))
        .route("/api/status/loop", get(get_loop).post(set_loop))
        .route("/api/status/shuffle", get(get_shuffle).post(set_shuffle))
        .route("/api/status/volume", get(get_volume).post(set_volume))
}

#[derive(Deserialize)]
struct PositionArgs {
    seconds: i64,
}

async fn get_position(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().get_position().await.map(Payload::Position).into()
}

async fn set_position(
    State(app): State<Arc<AppState>>,
    Json(PositionArgs { seconds }): Json<PositionArgs>,
) -> Reply {
    app.backend().set_position(seconds).await.into()
}

#[derive(Deserialize)]
struct LoopArgs {
    #[serde(default)]
    r#loop: Option<String>,
}

/// Capitalizes the input (`playlist` and `PLAYLIST` both become `Playlist`)
/// before matching it against the loop modes.
fn parse_loop(input: &str) -> Result<LoopMode, RequestError> {
    let mut chars = input.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    LoopMode::from_protocol(&capitalized).ok_or_else(|| RequestError::InvalidLoop(input.to_owned()))
}

async fn get_loop(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().get_loop().await.map(Payload::Loop).into()
}

async fn set_loop(
    State(app): State<Arc<AppState>>,
    Json(LoopArgs { r#loop }): Json<LoopArgs>,
) -> Result<Reply, RequestError> {
    let mode = r#loop.as_deref().map(parse_loop).transpose()?;
    Ok(app.backend().set_loop(mode).await.into())
}

#[derive(Deserialize)]
struct ShuffleArgs {
    shuffle: bool,
}

async fn get_shuffle(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().get_shuffle().await.map(Payload::Shuffle).into()
}

async fn set_shuffle(
    State(app): State<Arc<AppState>>,
    Json(ShuffleArgs { shuffle }): Json<ShuffleArgs>,
) -> Reply {
    app.backend().set_shuffle(shuffle).await.into()
}

#[derive(Deserialize)]
struct VolumeArgs {
    volume: f64,
}

async fn get_volume(State(app): State<Arc<AppState>>) -> Reply {
    app.backend().get_volume().await.map(Payload::Volume).into()
}

async fn set_volume(
    State(app): State<Arc<AppState>>,
    Json(VolumeArgs { volume }): Json<VolumeArgs>,
) -> Reply {
    app.backend().set_volume(volume.clamp(0.0, 1.0)).await.into()
}
