//! # TIDAL Integration Module
//!
//! Client for the TIDAL catalog API: client-credentials authorization, a
//! small query engine and the tracks endpoint built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! TidalApi (owns one CredentialStore)
//!     ├── AuthorizationManager  POST {auth_url}, Basic auth
//!     └── TracksEndpoint        GET {api_url}/tracks..., Bearer auth
//!              ↓
//!     Query / ListQuery (request assembly, execution, decoding)
//!              ↓
//!     reqwest
//! ```
//!
//! ## Query engine
//!
//! [`Query`] targets a single resource and surfaces every failure as a
//! [`TidalError`]. [`ListQuery`] adds offset/limit tracking and never fails
//! once it has been built: transport errors, non-2xx statuses and decode
//! errors come back as a [`ListQueryResult`] with
//! [`ListQueryStatus::Failure`], a message and no items.
//!
//! Both builders are consumed on execution and are single-use.
//!
//! ## Authorization
//!
//! [`AuthorizationManager::authorize`] reuses cached credentials while they
//! have more than an hour left ([`REFRESH_THRESHOLD_SECONDS`]) and otherwise
//! requests a new token. Nothing is refreshed in the background and nothing
//! is retried.
//!
//! ## Usage
//!
//! ```ignore
//! let api = TidalApi::new();
//! api.authorize(&client_id, &client_secret).await?;
//!
//! let track = api.tracks.get("345485959", "US").await?;
//! let page = api
//!     .tracks
//!     .list_by_isrc("USSM12209515", "US", Pagination::new(Some(0), Some(10)))
//!     .await?;
//! if !page.is_success() {
//!     eprintln!("{}", page.message().unwrap_or_default());
//! }
//! ```

pub mod auth;
pub mod list_query;
pub mod query;
pub mod tracks;

use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::TidalConfig,
    error::TidalError,
    management::{CredentialStore, Credentials},
};

pub use auth::{AuthorizationManager, REFRESH_THRESHOLD_SECONDS};
pub use list_query::{ListEnvelope, ListQuery, ListQueryResult, ListQueryStatus};
pub use query::{ContentType, HttpMethod, Query};
pub use tracks::{Pagination, TracksEndpoint};

/// Entry point of the library.
///
/// Credentials live in a store owned by this value; two clients never share
/// credentials, and dropping the client drops them.
#[derive(Debug)]
pub struct TidalApi {
    store: Arc<CredentialStore>,
    authorization: AuthorizationManager,
    pub tracks: TracksEndpoint,
}

impl TidalApi {
    pub fn new() -> Self {
        Self::with_config(TidalConfig::default())
    }

    pub fn with_config(config: TidalConfig) -> Self {
        let client = Client::new();
        let store = Arc::new(CredentialStore::new());

        TidalApi {
            authorization: AuthorizationManager::new(&client, config.auth_url, Arc::clone(&store)),
            tracks: TracksEndpoint::new(&client, config.api_url, Arc::clone(&store)),
            store,
        }
    }

    /// Authorizes unless the current credentials are good for more than an hour.
    pub async fn authorize(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Arc<Credentials>, TidalError> {
        self.authorization
            .authorize(client_id, client_secret, false)
            .await
    }

    /// Always requests new credentials.
    pub async fn force_authorize(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Arc<Credentials>, TidalError> {
        self.authorization
            .authorize(client_id, client_secret, true)
            .await
    }

    /// Forgets the current credentials. Not needed for refreshing.
    pub fn forget_credentials(&self) {
        self.authorization.forget_credentials();
    }

    pub fn credentials(&self) -> Option<Arc<Credentials>> {
        self.store.get()
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Default for TidalApi {
    fn default() -> Self {
        Self::new()
    }
}
