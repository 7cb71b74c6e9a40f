use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::TidalError,
    management::{CredentialStore, Credentials},
    tidal::query::{ContentType, HttpMethod, Query},
    types::AuthorizationResponse,
    utils,
};

/// Cached credentials with less than this many seconds left are refreshed.
pub const REFRESH_THRESHOLD_SECONDS: u64 = 60 * 60;

/// Obtains credentials through the client-credentials grant and decides when
/// the cached ones need replacing.
///
/// Refresh is lazy: the cached credentials are only checked when
/// [`AuthorizationManager::authorize`] is called. Concurrent calls are
/// serialized, so at most one token request is in flight per manager.
#[derive(Debug)]
pub struct AuthorizationManager {
    client: Client,
    auth_url: String,
    store: Arc<CredentialStore>,
    refresh_lock: Mutex<()>,
}

impl AuthorizationManager {
    pub fn new(client: &Client, auth_url: impl Into<String>, store: Arc<CredentialStore>) -> Self {
        AuthorizationManager {
            client: client.clone(),
            auth_url: auth_url.into(),
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns usable credentials, requesting new ones when there are none,
    /// when the cached ones expire within [`REFRESH_THRESHOLD_SECONDS`], or
    /// when `force` is set.
    ///
    /// # Errors
    ///
    /// - [`TidalError::InvalidCredentials`] if the id or secret is empty; no
    ///   request is made.
    /// - [`TidalError::Unauthorized`] if the token endpoint cannot be reached
    ///   or does not answer `200 OK` with a token.
    pub async fn authorize(
        &self,
        client_id: &str,
        client_secret: &str,
        force: bool,
    ) -> Result<Arc<Credentials>, TidalError> {
        validate_client(client_id, client_secret)?;

        let _guard = self.refresh_lock.lock().await;

        if !force {
            if let Some(current) = self.store.get() {
                let expires_in = current.expires_in_seconds();
                if expires_in > REFRESH_THRESHOLD_SECONDS {
                    debug!(expires_in, "reusing cached credentials");
                    return Ok(current);
                }
                debug!(expires_in, "cached credentials are due for refresh");
            }
        }

        let credentials = Arc::new(self.request_credentials(client_id, client_secret).await?);
        self.store.set(Arc::clone(&credentials));
        debug!(
            expires_in = credentials.expiration_time_seconds(),
            "stored new credentials"
        );
        Ok(credentials)
    }

    /// Drops the cached credentials. Requests already built keep their token.
    pub fn forget_credentials(&self) {
        self.store.clear();
    }

    pub fn credentials(&self) -> Option<Arc<Credentials>> {
        self.store.get()
    }

    /// Cached credentials, provided they are still usable for bearer auth.
    pub fn try_get_credentials(&self) -> Result<Arc<Credentials>, TidalError> {
        match self.store.get() {
            Some(credentials) if credentials.is_usable() => Ok(credentials),
            _ => Err(TidalError::Unauthorized),
        }
    }

    async fn request_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Credentials, TidalError> {
        let response: AuthorizationResponse = Query::new(&self.client, &self.auth_url)
            .method(HttpMethod::Post)
            .content_type(ContentType::FormUrlEncoded)
            .basic_auth(utils::encode_basic_credentials(client_id, client_secret))
            .body("grant_type=client_credentials")
            .execute()
            .await
            .map_err(|err| {
                warn!(error = %err, "authorization request was rejected");
                TidalError::Unauthorized
            })?;

        Ok(Credentials::from(response))
    }
}

fn validate_client(client_id: &str, client_secret: &str) -> Result<(), TidalError> {
    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        return Err(TidalError::InvalidCredentials);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(store: Arc<CredentialStore>) -> AuthorizationManager {
        // nothing listens here; tests below must not reach the network
        AuthorizationManager::new(&Client::new(), "http://127.0.0.1:9/token", store)
    }

    #[tokio::test]
    async fn empty_client_id_is_invalid() {
        let mgr = manager(Arc::new(CredentialStore::new()));
        let err = mgr.authorize("", "secret", false).await.unwrap_err();
        assert!(matches!(err, TidalError::InvalidCredentials));
    }

    #[tokio::test]
    async fn empty_client_secret_is_invalid() {
        let mgr = manager(Arc::new(CredentialStore::new()));
        let err = mgr.authorize("id", "", true).await.unwrap_err();
        assert!(matches!(err, TidalError::InvalidCredentials));
    }

    #[tokio::test]
    async fn long_lived_cache_is_returned_without_request() {
        let store = Arc::new(CredentialStore::new());
        let cached = Arc::new(Credentials::new("cached", 86_400));
        store.set(Arc::clone(&cached));

        let mgr = manager(store);
        let got = mgr.authorize("id", "secret", false).await.unwrap();
        assert!(Arc::ptr_eq(&got, &cached));
    }

    #[test]
    fn try_get_requires_usable_credentials() {
        let store = Arc::new(CredentialStore::new());
        let mgr = manager(Arc::clone(&store));
        assert!(mgr.try_get_credentials().unwrap_err().is_unauthorized());

        store.set(Arc::new(Credentials::new("", 3600)));
        assert!(mgr.try_get_credentials().is_err());

        store.set(Arc::new(Credentials::new("token", 3600)));
        assert_eq!(mgr.try_get_credentials().unwrap().access_token(), "token");

        mgr.forget_credentials();
        assert!(mgr.credentials().is_none());
    }
}
