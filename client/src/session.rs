//! Explicit session context.
//!
//! There is deliberately no process-wide current user. The caller owns a
//! [`SessionState`], establishes a [`Session`] from a successful login, and
//! passes read-only views to whatever needs the identity. Logout clears both
//! the session and the reference cache so nothing leaks into the next user's
//! session.

use crate::cache::TtlCache;
use shared::User;

/// Read-only view of the logged-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn phone(&self) -> &str {
        &self.user.phone
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// Session holder with login/logout lifecycle.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session for a freshly verified user, replacing any
    /// previous one.
    pub fn establish(&mut self, user: User) -> &Session {
        self.current.insert(Session::new(user))
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Admin check that is safely false when nobody is logged in.
    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(Session::is_admin)
    }

    /// End the session and drop all cached reference data with it.
    pub async fn logout(&mut self, cache: &TtlCache) {
        self.current = None;
        cache.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CacheStore;
    use shared::Role;

    fn user(role: Role) -> User {
        User {
            id: "0911222333".to_string(),
            phone: "0911222333".to_string(),
            name: "Mei".to_string(),
            role,
        }
    }

    #[test]
    fn test_establish_and_read_session() {
        let mut state = SessionState::new();
        assert!(!state.is_logged_in());
        assert!(!state.is_admin());

        state.establish(user(Role::User));
        let session = state.current().unwrap();
        assert_eq!(session.phone(), "0911222333");
        assert!(!session.is_admin());
        assert!(state.is_logged_in());
    }

    #[test]
    fn test_admin_session() {
        let mut state = SessionState::new();
        state.establish(user(Role::Admin));
        assert!(state.is_admin());
    }

    #[test]
    fn test_establish_replaces_previous_session() {
        let mut state = SessionState::new();
        state.establish(user(Role::Admin));

        let mut other = user(Role::User);
        other.phone = "0955666777".to_string();
        state.establish(other);

        let session = state.current().unwrap();
        assert_eq!(session.phone(), "0955666777");
        assert!(!state.is_admin());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_cache() {
        let store = CacheStore::open_test()
            .await
            .expect("Failed to create test store");
        let cache = TtlCache::new(store);
        cache.set("markets", &vec!["m1".to_string()]).await;

        let mut state = SessionState::new();
        state.establish(user(Role::User));

        state.logout(&cache).await;

        assert!(!state.is_logged_in());
        let markets: Option<Vec<String>> = cache.get("markets").await;
        assert!(markets.is_none());
    }
}
