use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use voyant_core::{RoleFlags, TokenPair, User};
use voyant_shared::Masked;
use voyant_store::app_config::StorageConfig;
use voyant_store::TokenStorage;

/// Immutable view of the session at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub access_token: Option<Masked<String>>,
    pub refresh_token: Option<Masked<String>>,
    pub user: Option<User>,
    /// True until the start-up token validation has finished.
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn flags(&self) -> RoleFlags {
        RoleFlags::for_user(self.user.as_ref())
    }

    pub fn is_admin(&self) -> bool {
        self.flags().is_admin
    }

    pub fn is_organizer(&self) -> bool {
        self.flags().is_organizer
    }

    pub fn is_customer(&self) -> bool {
        self.flags().is_customer
    }
}

/// Storage keys for the token pair.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    pub access: String,
    pub refresh: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        let defaults = StorageConfig::default();
        Self {
            access: defaults.access_key,
            refresh: defaults.refresh_key,
        }
    }
}

impl From<&StorageConfig> for StorageKeys {
    fn from(cfg: &StorageConfig) -> Self {
        Self {
            access: cfg.access_key.clone(),
            refresh: cfg.refresh_key.clone(),
        }
    }
}

/// Holds the token pair and current user. Every read gets an immutable snapshot;
/// every change goes through one of the mutation methods, which also keep storage in sync.
///
/// The network side (login, refresh, profile) lives in [`crate::auth::AuthApi`] and
/// [`crate::http::HttpClient`]; this type only owns state.
pub struct SessionStore {
    state: ArcSwap<SessionSnapshot>,
    storage: Arc<dyn TokenStorage>,
    keys: StorageKeys,
}

impl SessionStore {
    /// Restores tokens from storage. When an access token is present the session starts in
    /// the loading state until [`crate::auth::AuthApi::bootstrap`] validates it.
    pub fn new(storage: Arc<dyn TokenStorage>, keys: StorageKeys) -> Self {
        let access_token = storage.get(&keys.access).map(Masked);
        let refresh_token = storage.get(&keys.refresh).map(Masked);
        let loading = access_token.is_some();
        debug!("Session restored from storage (token present: {})", loading);
        Self {
            state: ArcSwap::from_pointee(SessionSnapshot {
                access_token,
                refresh_token,
                user: None,
                loading,
            }),
            storage,
            keys,
        }
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.state.load_full()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.load().access_token.as_ref().map(|t| t.expose().clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.load().refresh_token.as_ref().map(|t| t.expose().clone())
    }

    fn update(&self, apply: impl Fn(&mut SessionSnapshot)) {
        self.state.rcu(|current| {
            let mut next = SessionSnapshot::clone(current);
            apply(&mut next);
            next
        });
    }

    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            warn!("Failed to update token storage key {}: {}", key, e);
        }
    }

    pub(crate) fn store_tokens(&self, pair: &TokenPair) {
        self.persist(&self.keys.access, Some(pair.access.expose()));
        if let Some(refresh) = &pair.refresh {
            self.persist(&self.keys.refresh, Some(refresh.expose()));
        }
        self.update(|s| {
            s.access_token = Some(pair.access.clone());
            if let Some(refresh) = &pair.refresh {
                s.refresh_token = Some(refresh.clone());
            }
        });
    }

    pub(crate) fn set_user(&self, user: User) {
        info!("Session user set: {} ({:?})", user.username, user.role);
        self.update(|s| {
            s.user = Some(user.clone());
            s.loading = false;
        });
    }

    pub(crate) fn finish_loading(&self) {
        self.update(|s| s.loading = false);
    }

    /// Clears both tokens and the user, in storage and in memory. No server call.
    pub fn logout(&self) {
        self.persist(&self.keys.access, None);
        self.persist(&self.keys.refresh, None);
        self.state.store(Arc::new(SessionSnapshot::default()));
        info!("Session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyant_core::Role;
    use voyant_store::MemoryTokenStorage;

    fn store_with(entries: &[(&str, &str)]) -> (Arc<MemoryTokenStorage>, SessionStore) {
        let storage = Arc::new(MemoryTokenStorage::with_entries(entries.iter().copied()));
        let session = SessionStore::new(storage.clone(), StorageKeys::default());
        (storage, session)
    }

    fn admin() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1, "username": "root", "role": "ADMIN"
        }))
        .unwrap()
    }

    #[test]
    fn test_restores_tokens_and_starts_loading() {
        let (_, session) = store_with(&[("access_token", "a1"), ("refresh_token", "r1")]);
        let snap = session.snapshot();
        assert!(snap.is_authenticated());
        assert!(snap.loading);
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn test_empty_storage_is_anonymous() {
        let (_, session) = store_with(&[]);
        let snap = session.snapshot();
        assert!(!snap.is_authenticated());
        assert!(!snap.loading);
        assert_eq!(snap.flags(), RoleFlags::default());
    }

    #[test]
    fn test_store_tokens_persists_and_keeps_refresh() {
        let (storage, session) = store_with(&[("refresh_token", "r0")]);
        session.store_tokens(&TokenPair {
            access: Masked::from("a2"),
            refresh: None,
        });
        assert_eq!(storage.get("access_token").as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().as_deref(), Some("r0"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let (storage, session) = store_with(&[("access_token", "a1"), ("refresh_token", "r1")]);
        session.set_user(admin());
        assert!(session.snapshot().is_admin());

        session.logout();
        let snap = session.snapshot();
        assert!(!snap.is_authenticated());
        assert_eq!(snap.refresh_token, None);
        assert_eq!(snap.user, None);
        assert!(storage.is_empty());

        // Logging out an empty session is harmless.
        session.logout();
        assert!(!session.snapshot().is_authenticated());
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let (_, session) = store_with(&[("access_token", "a1")]);
        let before = session.snapshot();
        session.set_user(admin());
        assert_eq!(before.user, None);
        assert_eq!(session.snapshot().user.as_ref().map(|u| u.role), Some(Role::Admin));
        assert!(!session.snapshot().loading);
    }
}
