use std::sync::{Arc, Mutex, PoisonError};

use crate::management::Credentials;

/// Holds zero or one set of credentials for a client.
///
/// Every [`TidalApi`](crate::tidal::TidalApi) owns one store and shares it
/// with its endpoints, so the slot lives exactly as long as the client.
#[derive(Debug, Default)]
pub struct CredentialStore {
    slot: Mutex<Option<Arc<Credentials>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<Credentials>> {
        self.lock().clone()
    }

    /// Overwrites whatever was stored before.
    pub fn set(&self, credentials: Arc<Credentials>) {
        *self.lock() = Some(credentials);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<Credentials>>> {
        // the slot is always in a consistent state, so a poisoned lock is still usable
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = CredentialStore::new();
        assert!(store.is_empty());
        assert!(store.get().is_none());
    }

    #[test]
    fn set_overwrites_and_clear_resets() {
        let store = CredentialStore::new();
        let first = Arc::new(Credentials::new("first", 3600));
        let second = Arc::new(Credentials::new("second", 3600));

        store.set(Arc::clone(&first));
        assert!(Arc::ptr_eq(&store.get().unwrap(), &first));

        store.set(Arc::clone(&second));
        assert_eq!(store.get().unwrap().access_token(), "second");

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn clearing_keeps_handed_out_credentials_alive() {
        let store = CredentialStore::new();
        store.set(Arc::new(Credentials::new("token", 3600)));
        let held = store.get().unwrap();

        store.clear();
        assert_eq!(held.access_token(), "token");
    }
}
