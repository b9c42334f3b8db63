use super::{dbus::DbusBackend, PlayerBackend};
use anyhow::{anyhow, Context, Result};
use futures::future::{BoxFuture, FutureExt};
use std::{collections::HashMap, sync::Arc};

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub player: String,
}

pub type BackendConstructor =
    for<'a> fn(&'a BackendConfig) -> BoxFuture<'a, Result<Arc<dyn PlayerBackend>>>;

pub struct BackendRegistry {
    constructors: HashMap<&'static str, BackendConstructor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("dbus", dbus_backend);
        registry
    }

    pub fn register(&mut self, name: &'static str, constructor: BackendConstructor) {
        if self.constructors.insert(name, constructor).is_some() {
            tracing::warn!("backend {name} registered twice, keeping the last one");
        }
    }

    pub async fn create(
        &self,
        name: &str,
        config: &BackendConfig,
    ) -> Result<Arc<dyn PlayerBackend>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| anyhow!("backend \"{name}\" not found"))?;
        constructor(config).await
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn dbus_backend(config: &BackendConfig) -> BoxFuture<'_, Result<Arc<dyn PlayerBackend>>> {
    async move {
        let backend = DbusBackend::connect(&config.player)
            .await
            .with_context(|| format!("unable to connect to MPRIS player {}", config.player))?;
        Ok(Arc::new(backend) as Arc<dyn PlayerBackend>)
    }
    .boxed()
}
