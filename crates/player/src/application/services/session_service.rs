//! Session Service - who is logged in, backed by durable storage
//!
//! `SessionStore` is the single source of truth for the session record. After
//! every successful login, signup or logout the persisted (token, username)
//! pair agrees with the user handed back to the caller.

use std::sync::Arc;

use snooze_domain::{DisplayName, LoginToken, User, Username};

use crate::application::SessionError;
use crate::ports::outbound::{storage_keys, ApiError, StorageProvider, StoryApiPort};

/// Owns the session record and the calls that create or refresh it.
pub struct SessionStore<S: StorageProvider> {
    api: Arc<dyn StoryApiPort>,
    storage: S,
}

impl<S: StorageProvider> SessionStore<S> {
    pub fn new(api: Arc<dyn StoryApiPort>, storage: S) -> Self {
        Self { api, storage }
    }

    /// Restore the user from the persisted session record.
    ///
    /// Never fails: a missing, half-written or stale record, or an unreachable
    /// API, all yield `None`. A record the server has definitively refused
    /// (token rejected, account gone) is cleared along with half-written ones;
    /// a transport failure keeps it for the next attempt.
    pub async fn restore_session(&self) -> Option<User> {
        let token = self.storage.load(storage_keys::TOKEN);
        let username = self.storage.load(storage_keys::USERNAME);

        let (token, username) = match (token, username) {
            (Some(token), Some(username)) => (token, username),
            (None, None) => return None,
            _ => {
                tracing::warn!("Discarding incomplete session record");
                self.forget_credentials();
                return None;
            }
        };

        let (token, username) = match (LoginToken::new(token), Username::new(username)) {
            (Ok(token), Ok(username)) => (token, username),
            _ => {
                tracing::warn!("Discarding malformed session record");
                self.forget_credentials();
                return None;
            }
        };

        match self.api.fetch_user(&token, &username).await {
            Ok(Some(user)) => {
                tracing::info!(username = %user.username, "Restored session");
                Some(user)
            }
            Ok(None) => {
                tracing::info!(username = %username, "Session user no longer exists");
                self.forget_credentials();
                None
            }
            Err(ApiError::Unauthorized(reason)) => {
                tracing::info!(username = %username, reason = %reason, "Stored token was refused");
                self.forget_credentials();
                None
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Could not restore session");
                None
            }
        }
    }

    /// Log in and persist the session record.
    ///
    /// On failure the stored record is left exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let username = Username::new(username)?;

        let user = self
            .api
            .authenticate(&username, password)
            .await
            .map_err(|e| {
                tracing::info!(username = %username, error = %e, "Login failed");
                SessionError::from_login(e)
            })?;

        tracing::info!(username = %user.username, "Logged in");
        self.persist(&user);
        Ok(user)
    }

    /// Create an account, then persist the session record exactly like `login`.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, SessionError> {
        let username = Username::new(username)?;
        let display_name = DisplayName::new(display_name)?;
        if password.is_empty() {
            return Err(SessionError::Validation("Password cannot be empty".into()));
        }

        let user = self
            .api
            .create_account(&username, password, &display_name)
            .await
            .map_err(|e| {
                tracing::info!(username = %username, error = %e, "Signup failed");
                SessionError::from_signup(e)
            })?;

        tracing::info!(username = %user.username, "Account created");
        self.persist(&user);
        Ok(user)
    }

    /// Clear the durable store entirely.
    ///
    /// Everything session-scoped is invalid afterwards; callers treat this as
    /// a full reset.
    pub fn logout(&self) {
        self.storage.clear();
        tracing::info!("Logged out");
    }

    /// Refetch the full user record with the user's own token and username.
    pub async fn refresh(&self, user: &User) -> Result<User, SessionError> {
        match self.api.fetch_user(&user.token, &user.username).await? {
            Some(user) => Ok(user),
            None => Err(SessionError::NotFound(format!("user {}", user.username))),
        }
    }

    fn persist(&self, user: &User) {
        self.storage.save(storage_keys::TOKEN, user.token.expose());
        self.storage.save(storage_keys::USERNAME, user.username.as_str());
    }

    fn forget_credentials(&self) {
        self.storage.remove(storage_keys::TOKEN);
        self.storage.remove(storage_keys::USERNAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::mock::MemoryStorageProvider;
    use crate::infrastructure::testing::fixtures;
    use crate::ports::outbound::MockStoryApiPort;
    use mockall::predicate::*;

    fn store(
        api: MockStoryApiPort,
        storage: MemoryStorageProvider,
    ) -> SessionStore<MemoryStorageProvider> {
        SessionStore::new(Arc::new(api), storage)
    }

    #[tokio::test]
    async fn login_persists_token_and_username() {
        let mut api = MockStoryApiPort::new();
        api.expect_authenticate()
            .withf(|username, password| username.as_str() == "alice" && password == "hunter2")
            .returning(|_, _| Ok(fixtures::user("alice", "Alice", "abc123")));
        let storage = MemoryStorageProvider::new();

        let user = store(api, storage.clone())
            .login("alice", "hunter2")
            .await
            .unwrap();

        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(storage.load(storage_keys::TOKEN).as_deref(), Some("abc123"));
        assert_eq!(storage.load(storage_keys::USERNAME).as_deref(), Some("alice"));
        assert_eq!(user.token.expose(), "abc123");
    }

    #[tokio::test]
    async fn failed_login_leaves_storage_untouched() {
        let mut api = MockStoryApiPort::new();
        api.expect_authenticate()
            .returning(|_, _| Err(ApiError::Unauthorized("bad credentials".into())));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "old-token");
        storage.save(storage_keys::USERNAME, "bob");

        let result = store(api, storage.clone()).login("alice", "wrong").await;

        assert_eq!(result, Err(SessionError::Authentication));
        assert_eq!(storage.load(storage_keys::TOKEN).as_deref(), Some("old-token"));
        assert_eq!(storage.load(storage_keys::USERNAME).as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn login_with_blank_username_never_calls_api() {
        let api = MockStoryApiPort::new();
        let result = store(api, MemoryStorageProvider::new()).login("  ", "pw").await;
        assert!(matches!(result, Err(SessionError::Validation(_))));
    }

    #[tokio::test]
    async fn signup_persists_like_login() {
        let mut api = MockStoryApiPort::new();
        api.expect_create_account()
            .withf(|username, _, name| username.as_str() == "carol" && name.as_str() == "Carol")
            .returning(|_, _, _| Ok(fixtures::user("carol", "Carol", "tok-c")));
        let storage = MemoryStorageProvider::new();

        let user = store(api, storage.clone())
            .signup("carol", "pw", "Carol")
            .await
            .unwrap();

        assert_eq!(user.name.as_str(), "Carol");
        assert_eq!(storage.load(storage_keys::TOKEN).as_deref(), Some("tok-c"));
        assert_eq!(storage.load(storage_keys::USERNAME).as_deref(), Some("carol"));
    }

    #[tokio::test]
    async fn duplicate_signup_is_validation_error() {
        let mut api = MockStoryApiPort::new();
        api.expect_create_account().returning(|_, _, _| {
            Err(ApiError::Rejected {
                status: 409,
                message: "Username already taken".into(),
            })
        });
        let storage = MemoryStorageProvider::new();

        let result = store(api, storage.clone()).signup("alice", "pw", "Alice").await;

        assert_eq!(
            result,
            Err(SessionError::Validation("Username already taken".into()))
        );
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn restore_without_record_is_none_and_skips_api() {
        let api = MockStoryApiPort::new();
        let restored = store(api, MemoryStorageProvider::new()).restore_session().await;
        assert!(restored.is_none());
    }

    #[tokio::test]
    async fn restore_fetches_user_for_stored_record() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user()
            .withf(|token, username| token.expose() == "abc123" && username.as_str() == "alice")
            .times(1)
            .returning(|_, _| Ok(Some(fixtures::user("alice", "Alice", "abc123"))));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");

        let restored = store(api, storage).restore_session().await.unwrap();

        assert_eq!(restored.name.as_str(), "Alice");
        assert!(restored.favorites.is_empty());
    }

    #[tokio::test]
    async fn restore_with_stale_token_is_none_and_forgets_it() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user()
            .returning(|_, _| Err(ApiError::Unauthorized("expired".into())));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "stale");
        storage.save(storage_keys::USERNAME, "alice");

        assert!(store(api, storage.clone()).restore_session().await.is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn restore_of_removed_account_forgets_the_record() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user().returning(|_, _| Ok(None));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");

        assert!(store(api, storage.clone()).restore_session().await.is_none());
        assert!(storage.load(storage_keys::TOKEN).is_none());
        assert!(storage.load(storage_keys::USERNAME).is_none());
    }

    #[tokio::test]
    async fn restore_when_api_unreachable_keeps_the_record() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user()
            .returning(|_, _| Err(fixtures::api_request_failed("connection refused")));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");

        assert!(store(api, storage.clone()).restore_session().await.is_none());
        assert_eq!(storage.load(storage_keys::TOKEN).as_deref(), Some("abc123"));
        assert_eq!(storage.load(storage_keys::USERNAME).as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn restore_clears_half_written_record() {
        let api = MockStoryApiPort::new();
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");

        assert!(store(api, storage.clone()).restore_session().await.is_none());
        assert!(storage.load(storage_keys::TOKEN).is_none());
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let api = MockStoryApiPort::new();
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");
        storage.save("theme", "dark");

        store(api, storage.clone()).logout();

        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn refresh_of_deleted_account_is_not_found() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user().returning(|_, _| Ok(None));

        let user = fixtures::user("alice", "Alice", "abc123");
        let result = store(api, MemoryStorageProvider::new()).refresh(&user).await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn refresh_propagates_network_failure() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user()
            .with(always(), always())
            .returning(|_, _| Err(fixtures::api_request_failed("timeout")));

        let user = fixtures::user("alice", "Alice", "abc123");
        let result = store(api, MemoryStorageProvider::new()).refresh(&user).await;

        assert_eq!(result, Err(SessionError::Network("timeout".into())));
    }
}
