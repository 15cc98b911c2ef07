use std::sync::Arc;

use chrono::{Local, Offset};

use crate::api::{ApiClient, Gateway, HttpGateway};
use crate::app::{BylineError, Result};
use crate::config::Config;
use crate::session::{LoggedInUser, Session, SessionStore};

/// Wires together the gateway, the typed API client and the session store.
pub struct AppContext {
    pub api: ApiClient,
    pub storage: SessionStore,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        let config = Config::load().map_err(|e| BylineError::Config(e.to_string()))?;
        let base_url = config
            .base_url()
            .map_err(|e| BylineError::Config(e.to_string()))?;
        let gateway: Arc<dyn Gateway + Send + Sync> = Arc::new(HttpGateway::new(base_url)?);
        Ok(Self {
            api: ApiClient::new(gateway),
            storage: SessionStore::at_default_path()?,
        })
    }

    /// For tests and embedding: explicit gateway and storage location.
    pub fn with_parts(gateway: Arc<dyn Gateway + Send + Sync>, storage: SessionStore) -> Self {
        Self {
            api: ApiClient::new(gateway),
            storage,
        }
    }

    /// Restore the session once at startup: local time zone plus whatever
    /// the persisted blob yields (absent or corrupt ⇒ logged out).
    pub fn session(&self) -> Session {
        let time_zone = Local::now().offset().fix();
        Session::new(time_zone, self.storage.load().map(LoggedInUser::from))
    }
}
