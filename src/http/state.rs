//! Application state shared by all handlers.
//!
//! Collaborators are injected explicitly. A missing one is reported once,
//! at the composition root, instead of failing inside a handler.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::affiliate::AffiliateLinkRewriter;
use crate::config::GatewayConfig;
use crate::search::{HttpProductSearch, ProductSearch};
use crate::supabase::{IdentityProvider, ProfileStore, SupabaseAuth, SupabaseProfiles};

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("missing required context: {0}")]
    MissingContext(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub affiliate: Arc<AffiliateLinkRewriter>,
    pub search: Arc<dyn ProductSearch>,
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn builder(config: GatewayConfig) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    /// Wire the HTTP-backed collaborators described by `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self, StartupError> {
        let timeout = Duration::from_secs(config.timeouts.upstream_secs);
        let affiliate = Arc::new(AffiliateLinkRewriter::from_config(
            &config.affiliate,
            config.runtime.mode,
        ));

        let search = HttpProductSearch::new(&config.search, timeout, affiliate.clone())?;
        let identity = SupabaseAuth::new(&config.supabase, timeout)?;
        let profiles = SupabaseProfiles::new(&config.supabase, timeout)?;

        AppStateBuilder::new(config)
            .affiliate(affiliate)
            .search(Arc::new(search))
            .identity(Arc::new(identity))
            .profiles(Arc::new(profiles))
            .build()
    }
}

/// Assembles an [`AppState`], failing fast on missing collaborators.
pub struct AppStateBuilder {
    config: GatewayConfig,
    affiliate: Option<Arc<AffiliateLinkRewriter>>,
    search: Option<Arc<dyn ProductSearch>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    profiles: Option<Arc<dyn ProfileStore>>,
}

impl AppStateBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            affiliate: None,
            search: None,
            identity: None,
            profiles: None,
        }
    }

    /// Override the rewriter. Defaults to one built from the config.
    pub fn affiliate(mut self, affiliate: Arc<AffiliateLinkRewriter>) -> Self {
        self.affiliate = Some(affiliate);
        self
    }

    pub fn search(mut self, search: Arc<dyn ProductSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn build(self) -> Result<AppState, StartupError> {
        let affiliate = match self.affiliate {
            Some(a) => a,
            None => Arc::new(AffiliateLinkRewriter::from_config(
                &self.config.affiliate,
                self.config.runtime.mode,
            )),
        };

        Ok(AppState {
            search: self.search.ok_or(StartupError::MissingContext("product search"))?,
            identity: self
                .identity
                .ok_or(StartupError::MissingContext("identity provider"))?,
            profiles: self
                .profiles
                .ok_or(StartupError::MissingContext("profile store"))?,
            affiliate,
            config: Arc::new(self.config),
        })
    }
}
