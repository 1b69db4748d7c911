//! Application context
//!
//! Single owner of the session state for the running client. Everything
//! that needs tenant or credential access gets it through here.

use confdesk_api::ApiClient;
use confdesk_navigation::RouteTable;
use confdesk_session::{SessionStore, TenantConfig};
use confdesk_storage::Database;

use crate::config::Config;
use crate::Result;

pub struct AppContext {
    config: Config,
    session: SessionStore,
    api: ApiClient,
    routes: RouteTable,
}

impl AppContext {
    /// Open the configured database and build the stores
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path)?;
        Self::build(config, db)
    }

    /// Build the stores over an already opened database
    pub fn with_database(config: Config, db: Database) -> Result<Self> {
        config.validate()?;
        Self::build(config, db)
    }

    fn build(config: Config, db: Database) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        let session = SessionStore::new(db, config.catalog(), http.clone());
        let api = ApiClient::new(session.clone(), http);

        Ok(Self {
            config,
            session,
            api,
            routes: RouteTable::default(),
        })
    }

    /// Restore persisted session state. Only the first call reads storage.
    pub fn initialize(&self) -> Result<Option<TenantConfig>> {
        if self.session.is_loaded() {
            tracing::debug!("Session already loaded, skipping restore");
            return Ok(self.session.current_config());
        }

        let current = self.session.initialize()?;

        tracing::info!(
            tenant = ?current.as_ref().map(|c| c.id.as_str()),
            "Client initialized"
        );

        Ok(current)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
