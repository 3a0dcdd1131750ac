use std::ops::Deref;
use std::sync::Arc;
use vhub_kernel::config::AppConfig;
use vhub_registry::PackageRegistry;

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    pub registry: Arc<PackageRegistry>,
}

/// Shared application state; cheap to clone into handlers and tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, registry: Arc<PackageRegistry>) -> Self {
        Self { inner: Arc::new(AppStateInner { config, registry }) }
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
