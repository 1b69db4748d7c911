//! Tenant configuration catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::auth::SessionCredentials;

/// Token replaced by the tenant id in the URL template
pub const CONFIG_ID_PLACEHOLDER: &str = "^CONFIG_ID^";

pub const DEFAULT_URL_TEMPLATE: &str = "https://ibronevik.ru/taxi/c/^CONFIG_ID^/api/v1/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Short unique identifier, substituted into the URL template
    pub id: String,
    pub name: String,
    pub status: String,
    pub description: String,
    /// Base API URL, derived on every read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether credentials are cached for this tenant, derived on every read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_authed: Option<bool>,
}

impl TenantConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: status.into(),
            description: description.into(),
            url: None,
            is_authed: None,
        }
    }

    /// Production tenants shipped with the client
    pub fn seeded() -> Vec<Self> {
        vec![
            Self::new("gruzvill", "Gruzvill", "active", "Freight transport configuration"),
            Self::new("children", "Children", "active", "Children's taxi for Spain"),
        ]
    }
}

/// Immutable list of tenants plus the URL template used to reach them
#[derive(Debug, Clone)]
pub struct TenantCatalog {
    url_template: String,
    tenants: Vec<TenantConfig>,
}

impl TenantCatalog {
    pub fn new(url_template: impl Into<String>, tenants: Vec<TenantConfig>) -> Self {
        // Stored entries never carry derived fields
        let tenants = tenants
            .into_iter()
            .map(|mut t| {
                t.url = None;
                t.is_authed = None;
                t
            })
            .collect();

        Self {
            url_template: url_template.into(),
            tenants,
        }
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    pub fn first(&self) -> Option<&TenantConfig> {
        self.tenants.first()
    }

    pub fn contains(&self, tenant_id: &str) -> bool {
        self.tenants.iter().any(|t| t.id == tenant_id)
    }

    /// Base URL for a tenant id. Does not check the id against the catalog.
    pub fn url_for(&self, tenant_id: &str) -> String {
        self.url_template.replacen(CONFIG_ID_PLACEHOLDER, tenant_id, 1)
    }

    /// Catalog entries with `url` and `is_authed` filled in
    pub fn resolve(&self, credentials: &BTreeMap<String, SessionCredentials>) -> Vec<TenantConfig> {
        self.tenants
            .iter()
            .map(|t| TenantConfig {
                url: Some(self.url_for(&t.id)),
                is_authed: Some(credentials.contains_key(&t.id)),
                ..t.clone()
            })
            .collect()
    }
}

impl Default for TenantCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, TenantConfig::seeded())
    }
}
