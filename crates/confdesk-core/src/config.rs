//! Client configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use confdesk_session::{TenantCatalog, TenantConfig, CONFIG_ID_PLACEHOLDER, DEFAULT_URL_TEMPLATE};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the local storage database
    pub database_path: PathBuf,
    /// Tenant API base URL, `^CONFIG_ID^` replaced by the tenant id
    pub api_url_template: String,
    /// Tenant catalog, in display order
    pub tenants: Vec<TenantConfig>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("confdesk.db"),
            api_url_template: DEFAULT_URL_TEMPLATE.to_string(),
            tenants: TenantConfig::seeded(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("confdesk"))
            .unwrap_or_else(|| PathBuf::from(".confdesk"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url_template.contains(CONFIG_ID_PLACEHOLDER) {
            return Err(CoreError::Config(format!(
                "api_url_template must contain {}",
                CONFIG_ID_PLACEHOLDER
            )));
        }

        let probe = self.api_url_template.replacen(CONFIG_ID_PLACEHOLDER, "probe", 1);
        url::Url::parse(&probe)
            .map_err(|e| CoreError::Config(format!("invalid api_url_template: {}", e)))?;

        let mut seen = HashSet::new();
        for tenant in &self.tenants {
            if tenant.id.trim().is_empty() {
                return Err(CoreError::Config("tenant id cannot be empty".to_string()));
            }
            if !seen.insert(tenant.id.as_str()) {
                return Err(CoreError::Config(format!(
                    "duplicate tenant id: {}",
                    tenant.id
                )));
            }
        }

        Ok(())
    }

    pub fn catalog(&self) -> TenantCatalog {
        TenantCatalog::new(self.api_url_template.clone(), self.tenants.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
