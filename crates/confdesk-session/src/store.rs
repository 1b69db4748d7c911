//! Session Store
//!
//! Owns the tenant catalog, the current tenant selection and the
//! per-tenant credential cache. Credentials are persisted on every
//! successful authentication, the selection on every switch.

use parking_lot::RwLock;
use reqwest::multipart::Form;
use std::collections::BTreeMap;
use std::sync::Arc;

use confdesk_storage::Database;

use crate::auth::{
    AuthOutcome, AuthReply, AuthState, Handshake, LoginData, SessionCredentials, TokenReply,
};
use crate::error::SessionError;
use crate::tenant::{TenantCatalog, TenantConfig};
use crate::Result;

/// Storage key holding the JSON map of tenant id to credentials
pub const AUTH_DATA_KEY: &str = "authData";
/// Storage key holding the raw id of the selected tenant
pub const CURRENT_CONFIG_KEY: &str = "currentConfigId";

#[derive(Debug, Default)]
struct SessionState {
    current_config_id: Option<String>,
    credentials: BTreeMap<String, SessionCredentials>,
    loaded: bool,
}

pub struct SessionStore {
    catalog: Arc<TenantCatalog>,
    state: Arc<RwLock<SessionState>>,
    /// Local storage for persistence
    db: Database,
    http: reqwest::Client,
}

impl SessionStore {
    pub fn new(db: Database, catalog: TenantCatalog, http: reqwest::Client) -> Self {
        let state = SessionState {
            current_config_id: catalog.first().map(|c| c.id.clone()),
            ..SessionState::default()
        };

        Self {
            catalog: Arc::new(catalog),
            state: Arc::new(RwLock::new(state)),
            db,
            http,
        }
    }

    /// Restore credentials and tenant selection from local storage.
    ///
    /// Meant to run once per process; a second call re-reads storage and
    /// overwrites whatever changed in memory since.
    pub fn initialize(&self) -> Result<Option<TenantConfig>> {
        let restored = match self.db.get_item(AUTH_DATA_KEY)? {
            Some(json) => {
                let raw: BTreeMap<String, Option<SessionCredentials>> =
                    serde_json::from_str(&json)?;
                Some(
                    raw.into_iter()
                        .filter_map(|(id, creds)| creds.map(|c| (id, c)))
                        .collect::<BTreeMap<_, _>>(),
                )
            }
            None => None,
        };
        let saved_id = self.db.get_item(CURRENT_CONFIG_KEY)?;

        let current = {
            let mut state = self.state.write();
            if state.loaded {
                tracing::warn!("Session store initialized twice, reloading from storage");
            }

            if let Some(credentials) = restored {
                state.credentials = credentials;
            }

            let current_id = match saved_id {
                Some(id) if self.catalog.contains(&id) => Some(id),
                Some(id) => {
                    tracing::warn!(tenant_id = %id, "Saved tenant no longer in catalog");
                    self.first_tenant_id()
                }
                None => self.first_tenant_id(),
            };
            state.current_config_id = current_id;
            state.loaded = true;

            tracing::info!(
                current = ?state.current_config_id,
                authed_tenants = state.credentials.len(),
                "Initialized session store"
            );

            self.resolve_current(&state)
        };

        Ok(current)
    }

    fn first_tenant_id(&self) -> Option<String> {
        self.catalog.first().map(|c| c.id.clone())
    }

    fn resolve_current(&self, state: &SessionState) -> Option<TenantConfig> {
        let id = state.current_config_id.as_deref()?;
        self.catalog
            .resolve(&state.credentials)
            .into_iter()
            .find(|c| c.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    pub fn catalog(&self) -> &TenantCatalog {
        &self.catalog
    }

    /// Catalog with `url` and `is_authed` computed from the current credentials
    pub fn list_configs(&self) -> Vec<TenantConfig> {
        self.catalog.resolve(&self.state.read().credentials)
    }

    pub fn config_by_id(&self, tenant_id: &str) -> Option<TenantConfig> {
        self.list_configs().into_iter().find(|c| c.id == tenant_id)
    }

    /// Base URL for a tenant id, without checking the catalog
    pub fn url_for(&self, tenant_id: &str) -> String {
        self.catalog.url_for(tenant_id)
    }

    pub fn get_credentials(&self, tenant_id: &str) -> Option<SessionCredentials> {
        self.state.read().credentials.get(tenant_id).cloned()
    }

    pub fn current_config(&self) -> Option<TenantConfig> {
        self.resolve_current(&self.state.read())
    }

    /// Select a tenant. The config is re-resolved against the live catalog,
    /// so stale derived fields on the argument are ignored.
    pub fn set_current_config(&self, config: &TenantConfig) -> Result<TenantConfig> {
        let fresh = self
            .config_by_id(&config.id)
            .ok_or_else(|| SessionError::UnknownTenant(config.id.clone()))?;

        self.db.set_item(CURRENT_CONFIG_KEY, &fresh.id)?;
        self.state.write().current_config_id = Some(fresh.id.clone());

        tracing::info!(tenant_id = %fresh.id, "Switched current tenant");

        Ok(fresh)
    }

    /// Run the two-step auth handshake against a tenant.
    ///
    /// Server-side rejections come back as [`AuthOutcome::Rejected`];
    /// only transport and decoding failures are returned as errors.
    pub async fn authenticate(&self, login: &LoginData, tenant_id: &str) -> Result<AuthOutcome> {
        let mut handshake = Handshake::new(tenant_id);

        match self.run_handshake(&mut handshake, login, tenant_id).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if !handshake.state().is_terminal() {
                    handshake.advance(AuthState::Failed)?;
                }
                tracing::warn!(tenant_id = %tenant_id, error = %e, "Authentication failed");
                Err(e)
            }
        }
    }

    async fn run_handshake(
        &self,
        handshake: &mut Handshake<'_>,
        login: &LoginData,
        tenant_id: &str,
    ) -> Result<AuthOutcome> {
        let base = self.catalog.url_for(tenant_id);

        handshake.advance(AuthState::AwaitingAuthHash)?;
        let form = Form::new()
            .text("login", login.login.clone())
            .text("password", login.password.clone())
            .text("type", login.kind.clone());
        let reply: AuthReply = self
            .http
            .post(format!("{base}auth"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !reply.is_success() {
            handshake.advance(AuthState::Rejected)?;
            tracing::info!(tenant_id = %tenant_id, code = ?reply.code, "Auth step rejected");
            return Ok(reply.rejection());
        }

        let auth_hash = reply.auth_hash()?;
        handshake.advance(AuthState::AwaitingToken)?;
        let form = Form::new().text("auth_hash", auth_hash);
        let reply: TokenReply = self
            .http
            .post(format!("{base}token"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !reply.is_success() {
            handshake.advance(AuthState::Rejected)?;
            tracing::info!(tenant_id = %tenant_id, code = ?reply.code, "Token step rejected");
            return Ok(reply.rejection());
        }

        let credentials = reply.credentials()?;
        self.store_credentials(tenant_id, credentials)?;
        handshake.advance(AuthState::Authenticated)?;

        tracing::info!(tenant_id = %tenant_id, "Authenticated");

        Ok(AuthOutcome::Success)
    }

    fn store_credentials(&self, tenant_id: &str, credentials: SessionCredentials) -> Result<()> {
        let mut state = self.state.write();
        let mut updated = state.credentials.clone();
        updated.insert(tenant_id.to_string(), credentials);

        // Memory only changes once storage has accepted the write
        self.db
            .set_item(AUTH_DATA_KEY, &serde_json::to_string(&updated)?)?;
        state.credentials = updated;

        Ok(())
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            state: Arc::clone(&self.state),
            db: self.db.clone(),
            http: self.http.clone(),
        }
    }
}
