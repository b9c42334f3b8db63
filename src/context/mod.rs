use self::app::AppState;
use crate::{backend::Reply, config::Config};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;

pub mod app;
mod auth;
mod meta;
mod player;
mod status;

pub async fn create_app_router(config: &Config) -> Result<Router> {
    let app = AppState::from_config(config)
        .await
        .context("unable to create app state")?;
    Ok(app.create_router())
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = match &self {
            Reply::Success(_) => StatusCode::OK,
            Reply::Failure(error) => {
                tracing::warn!("player operation failed: {error}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Could not parse \"{0}\" as one of \"None\", \"Playlist\" or \"Track\"")]
    InvalidLoop(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}
