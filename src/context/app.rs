use super::{auth::require_basic_auth, meta::meta_router, player::player_router, status::status_router};
use crate::{
    backend::{BackendRegistry, PlayerBackend},
    config::{Config, Users},
};
use anyhow::{Context, Result};
use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub struct AppState {
    backend: Arc<dyn PlayerBackend>,
    backend_name: String,
    users: Option<Users>,
}

pub type AppRouter = Router<Arc<AppState>>;

impl AppState {
    pub fn new(
        backend: Arc<dyn PlayerBackend>,
        backend_name: impl Into<String>,
        users: Option<Users>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            backend_name: backend_name.into(),
            users,
        })
    }

    pub async fn from_config(config: &Config) -> Result<Arc<Self>> {
        Self::from_registry(config, &BackendRegistry::with_defaults()).await
    }

    pub async fn from_registry(config: &Config, registry: &BackendRegistry) -> Result<Arc<Self>> {
        let backend = registry
            .create(&config.backend, &config.backend_config)
            .await
            .with_context(|| format!("unable to create backend {}", config.backend))?;
        if config.users.is_none() {
            tracing::warn!("no users configured, authentication is disabled");
        }
        Ok(Self::new(backend, config.backend.as_str(), config.users.clone()))
    }

    pub fn create_router(self: Arc<Self>) -> Router {
        Router::new()
            .merge(player_router())
            .merge(status_router())
            .merge(meta_router())
            .route_layer(from_fn_with_state(self.clone(), require_basic_auth))
            .with_state(self)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CompressionLayer::new()),
            )
    }

    pub fn backend(&self) -> &dyn PlayerBackend {
        self.backend.as_ref()
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn users(&self) -> Option<&Users> {
        self.users.as_ref()
    }
}
