//! Session lifecycle
//!
//! The manager owns the access token, the profile, and the durable
//! credential pair. Restore runs once at startup with no network traffic;
//! login and signup are the only operations that mint a session; logout is
//! synchronous and idempotent. The gateway reads the token through
//! [`TokenSlot`], which only this module writes.

pub mod store;

pub use store::CredentialStore;

use std::sync::{Arc, Mutex};

use crate::api::types::{AccountType, LoginRequest, SignupRequest, UserProfile};
use crate::api::{ApiResult, HealthApi};

/// Shared slot the gateway reads the current bearer token from. Cloning
/// shares the slot.
#[derive(Debug, Clone, Default)]
pub struct TokenSlot(Arc<Mutex<Option<String>>>);

impl TokenSlot {
    pub fn get(&self) -> Option<String> {
        self.0.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    fn set(&self, token: &str) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = None;
        }
    }
}

/// An established session: the token that authenticates it and the profile
/// it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub profile: UserProfile,
}

/// Clonable handle to the single session state. All mutation happens in
/// `login`, `signup`, and `logout`; the lock is never held across an await.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<dyn HealthApi>,
    store: CredentialStore,
    slot: TokenSlot,
    current: Arc<Mutex<Option<Session>>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn HealthApi>, store: CredentialStore, slot: TokenSlot) -> Self {
        Self {
            api,
            store,
            slot,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Restore a persisted session, if one exists. Runs before the UI and
    /// never touches the network: a stale token surfaces later as an
    /// `Unauthenticated` failure on the first real call.
    pub fn restore(&self) -> bool {
        match self.store.load() {
            Some((token, profile)) => {
                tracing::info!(username = %profile.username, "restored saved session");
                self.slot.set(&token);
                self.replace(Some(Session { token, profile }));
                true
            }
            None => false,
        }
    }

    /// Exchange credentials for a token, then fetch the canonical profile
    /// with it. A failed profile fetch does not fail the login: the session
    /// falls back to a minimal synthesized profile so the user still gets
    /// in with what they typed.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token = self.api.login(&request).await?.access_token;

        // The slot must carry the fresh token before the profile fetch so
        // that call authenticates as the user who just signed in.
        self.slot.set(&token);

        let profile = match self.api.profile().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed after login, using fallback profile");
                synthesized_profile(username)
            }
        };

        if let Err(e) = self.store.save(&token, &profile) {
            tracing::warn!(error = %e, "could not persist credentials, session is memory-only");
        }

        self.replace(Some(Session {
            token,
            profile: profile.clone(),
        }));
        tracing::info!(username = %profile.username, account_type = profile.account_type.as_str(), "signed in");
        Ok(profile)
    }

    /// Create an account, then sign in with the same credentials. Failures
    /// in the login leg surface exactly as login failures.
    pub async fn signup(&self, request: SignupRequest) -> ApiResult<UserProfile> {
        self.api.signup(&request).await?;
        tracing::info!(username = %request.username, "account created, signing in");
        self.login(&request.username, &request.password).await
    }

    /// Drop the session and both durable entries. Idempotent, no network.
    pub fn logout(&self) {
        self.slot.clear();
        self.replace(None);
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear stored credentials");
        }
        tracing::info!("signed out");
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.current.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    fn replace(&self, session: Option<Session>) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = session;
        }
    }
}

/// Minimal profile used when `/auth/me` fails right after a successful
/// token exchange. Placeholder id, the username the user typed, general
/// care track.
fn synthesized_profile(username: &str) -> UserProfile {
    UserProfile {
        id: 1,
        username: username.to_string(),
        email: String::new(),
        full_name: String::new(),
        account_type: AccountType::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::stub::StubApi;
    use crate::api::types::TokenResponse;

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            id: 42,
            username: username.into(),
            email: format!("{username}@example.com"),
            full_name: "Amina Wanjiru".into(),
            account_type: AccountType::Pregnant,
        }
    }

    fn manager(api: Arc<StubApi>) -> (SessionManager, CredentialStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));
        let manager = SessionManager::new(api, store.clone(), TokenSlot::default());
        (manager, store, dir)
    }

    #[tokio::test]
    async fn login_sets_token_then_fetches_profile() {
        let api = StubApi::new();
        api.script_login(Ok(TokenResponse {
            access_token: "tok-1".into(),
        }));
        api.script_profile(Ok(profile("amina")));

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));
        let slot = TokenSlot::default();
        api.watch_slot(slot.clone());
        let manager = SessionManager::new(api.clone(), store.clone(), slot);
        let got = manager.login("amina", "pw").await.unwrap();

        assert_eq!(got.username, "amina");
        assert_eq!(manager.current().unwrap().token, "tok-1");
        // Both durable entries were written together.
        let (token, stored) = store.load().unwrap();
        assert_eq!(token, "tok-1");
        assert_eq!(stored, got);
        // The profile call saw the fresh token.
        assert_eq!(api.token_seen_by_profile(), Some("tok-1".to_string()));
    }

    #[tokio::test]
    async fn login_falls_back_to_synthesized_profile() {
        let api = StubApi::new();
        api.script_login(Ok(TokenResponse {
            access_token: "tok-2".into(),
        }));
        api.script_profile(Err(ApiError::network("timeout")));

        let (manager, _store, _dir) = manager(api);
        let got = manager.login("amina", "pw").await.unwrap();

        assert_eq!(got.id, 1);
        assert_eq!(got.username, "amina");
        assert_eq!(got.account_type, AccountType::General);
        assert!(got.email.is_empty());
    }

    #[tokio::test]
    async fn failed_login_leaves_no_session() {
        let api = StubApi::new();
        api.script_login(Err(ApiError::invalid_credentials("Incorrect username or password")));

        let (manager, store, _dir) = manager(api);
        let err = manager.login("amina", "wrong").await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidCredentials(_)));
        assert!(manager.current().is_none());
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn signup_then_auto_login() {
        let api = StubApi::new();
        api.script_signup(Ok(()));
        api.script_login(Ok(TokenResponse {
            access_token: "tok-3".into(),
        }));
        api.script_profile(Ok(profile("neema")));

        let (manager, _store, _dir) = manager(api.clone());
        let request = SignupRequest {
            username: "neema".into(),
            email: "neema@example.com".into(),
            full_name: "Neema Achieng".into(),
            account_type: AccountType::Postnatal,
            password: "secret1".into(),
        };
        let got = manager.signup(request).await.unwrap();

        assert_eq!(got.username, "neema");
        assert!(manager.is_authenticated());
        assert_eq!(api.calls(), vec!["signup", "login", "profile"]);
    }

    #[tokio::test]
    async fn rejected_signup_never_logs_in() {
        let api = StubApi::new();
        api.script_signup(Err(ApiError::signup_rejected("Username already registered")));

        let (manager, _store, _dir) = manager(api.clone());
        let request = SignupRequest {
            username: "neema".into(),
            email: "neema@example.com".into(),
            full_name: "Neema Achieng".into(),
            account_type: AccountType::General,
            password: "secret1".into(),
        };
        let err = manager.signup(request).await.unwrap_err();

        assert!(matches!(err, ApiError::SignupRejected(_)));
        assert!(!manager.is_authenticated());
        assert_eq!(api.calls(), vec!["signup"]);
    }

    #[tokio::test]
    async fn restore_round_trip() {
        let api = StubApi::new();
        api.script_login(Ok(TokenResponse {
            access_token: "tok-4".into(),
        }));
        api.script_profile(Ok(profile("amina")));

        let (manager, store, _dir) = manager(api.clone());
        manager.login("amina", "pw").await.unwrap();

        // A second manager over the same store restores without network.
        let fresh = SessionManager::new(api.clone(), store, TokenSlot::default());
        assert!(fresh.restore());
        assert_eq!(fresh.current().unwrap().token, "tok-4");
        assert_eq!(api.calls(), vec!["login", "profile"]);
    }

    #[tokio::test]
    async fn logout_clears_everything_and_is_idempotent() {
        let api = StubApi::new();
        api.script_login(Ok(TokenResponse {
            access_token: "tok-5".into(),
        }));
        api.script_profile(Ok(profile("amina")));

        let (manager, store, _dir) = manager(api);
        manager.login("amina", "pw").await.unwrap();

        manager.logout();
        assert!(!manager.is_authenticated());
        assert!(store.load().is_none());
        manager.logout();
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn restore_with_empty_store_stays_signed_out() {
        let api = StubApi::new();
        let (manager, _store, _dir) = manager(api);
        assert!(!manager.restore());
        assert!(manager.current().is_none());
    }
}
