//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use storefront_commerce::catalog::{CategoryService, ProductService};
use storefront_commerce::search::ProductListController;
use storefront_data::{AssetResolver, HttpBackend};

use crate::config::StorefrontConfig;
use crate::output::Output;

/// Execution context for CLI commands.
///
/// The backend client is built on first use, so config commands still run
/// when the configured URL is unusable.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            StorefrontConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };
        let config = config.with_env();

        Ok(Self { config, output })
    }

    /// Client for the configured backend.
    pub fn backend(&self) -> Result<Arc<HttpBackend>> {
        let url = &self.config.backend.url;
        let backend = HttpBackend::new(url.clone(), &self.config.backend.timeouts())
            .with_context(|| format!("Invalid backend URL: {}", url))?;
        self.output.debug(&format!("Using backend {}", backend.base_url()));
        Ok(Arc::new(backend))
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<StorefrontConfig> {
        let config_names = ["storefront.toml", ".storefront.toml", "storefront.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path: PathBuf = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = StorefrontConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Category tree service over the configured backend.
    pub fn categories(&self) -> Result<Arc<CategoryService>> {
        Ok(Arc::new(CategoryService::new(self.backend()?)))
    }

    /// Product service over the configured backend.
    pub fn products(&self) -> Result<ProductService> {
        Ok(self.product_service(self.backend()?))
    }

    /// Product list controller; both services share one client.
    pub fn controller(&self) -> Result<ProductListController> {
        let backend = self.backend()?;
        let categories = Arc::new(CategoryService::new(backend.clone()));
        Ok(ProductListController::new(self.product_service(backend), categories))
    }

    fn product_service(&self, backend: Arc<HttpBackend>) -> ProductService {
        ProductService::new(
            backend,
            AssetResolver::new(self.config.backend.asset_base()),
            self.config.catalog.clone(),
        )
    }
}
