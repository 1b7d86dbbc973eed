//! Auth State Container
//!
//! Owns the session state (signed-in account, loading flag, error message and
//! the registered-account list) and keeps the persisted session in step with it.
//!
//! State is published through a `tokio::sync::watch` channel: views and the
//! route guard hold a receiver and re-render or re-evaluate on every change.
//! Every mutation goes through `send_modify`, so no lock is held across the
//! simulated network delay.

use crate::auth::error::{AuthError, AuthResult};
use crate::sequence::{RequestSequence, Ticket};
use crate::storage::{Account, RegisteredAccount, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Default simulated latency of a login request
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(800);

/// Snapshot of the auth state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Signed-in account (never carries a password)
    pub account: Option<Account>,
    pub authenticated: bool,
    /// A login is in flight
    pub loading: bool,
    /// Last login failure, shown until dismissed
    pub error: Option<String>,
    /// Registered accounts, passwords included
    pub accounts: Vec<RegisteredAccount>,
}

/// Login, logout and registration over a [`SessionStore`]
pub struct AuthContainer {
    store: Arc<SessionStore>,
    state: watch::Sender<AuthState>,
    sequence: RequestSequence,
    login_delay: Duration,
}

impl AuthContainer {
    /// Hydrate the container from persisted storage
    pub fn new(store: Arc<SessionStore>, login_delay: Duration) -> Self {
        let accounts = store.load_accounts();
        let account = store.load_current_session();

        match &account {
            Some(account) => tracing::info!(email = %account.email, "Restored persisted session"),
            None => tracing::debug!("No persisted session"),
        }

        let initial = AuthState {
            authenticated: account.is_some(),
            account,
            loading: false,
            error: None,
            accounts,
        };

        let (state, _) = watch::channel(initial);

        Self {
            store,
            state,
            sequence: RequestSequence::new(),
            login_delay,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().authenticated
    }

    pub fn current_account(&self) -> Option<Account> {
        self.state.borrow().account.clone()
    }

    /// Check credentials against the registered accounts after a simulated delay.
    ///
    /// The account list is captured when the call is made. Only the most
    /// recently issued login applies its result; an older one resolves with
    /// [`AuthError::Superseded`], as does any login overtaken by [`logout`](Self::logout).
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Account> {
        let (ticket, accounts) = self.sequence.issue_with(|| {
            let mut accounts = Vec::new();
            self.state.send_modify(|state| {
                state.loading = true;
                state.error = None;
                accounts = state.accounts.clone();
            });
            accounts
        });

        tracing::debug!(request = ticket, email = %email, "Login started");

        let mut pending = PendingLogin {
            container: self,
            ticket,
            settled: false,
        };

        tokio::time::sleep(self.login_delay).await;

        let matched = accounts
            .into_iter()
            .find(|entry| entry.credentials_match(email, password))
            .map(RegisteredAccount::into_account);

        let applied = self.sequence.apply_if_current(ticket, || match &matched {
            Some(account) => {
                self.store.save_current_session(account);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.authenticated = true;
                    state.account = Some(account.clone());
                });
            }
            None => {
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.authenticated = false;
                    state.error = Some(AuthError::InvalidCredentials.to_string());
                });
            }
        });
        pending.settled = true;

        if applied.is_none() {
            tracing::debug!(request = ticket, email = %email, "Login result discarded, superseded");
            return Err(AuthError::Superseded);
        }

        match matched {
            Some(account) => {
                tracing::info!(request = ticket, email = %account.email, "Login succeeded");
                Ok(account)
            }
            None => {
                tracing::warn!(request = ticket, email = %email, "Login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Sign out and forget the persisted session. Never fails.
    pub fn logout(&self) {
        self.sequence.issue_with(|| {
            self.store.clear_current_session();
            self.state.send_modify(|state| {
                state.account = None;
                state.authenticated = false;
                state.error = None;
                state.loading = false;
            });
        });

        tracing::info!("Logged out");
    }

    /// Dismiss the last login error
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Append an account to the registered list and persist the full list.
    ///
    /// The new account is not signed in. Duplicate emails are accepted; login
    /// matches the first entry in list order.
    pub fn register(&self, entry: RegisteredAccount) {
        let email = entry.email().to_string();

        self.state.send_modify(|state| {
            if state.accounts.iter().any(|a| a.email() == email) {
                tracing::warn!(email = %email, "Registering an account with an existing email");
            }
            state.accounts.push(entry);
            self.store.save_accounts(&state.accounts);
        });

        tracing::info!(email = %email, "Registered account");
    }
}

/// Clears the loading flag if a login future is dropped before it resolves
struct PendingLogin<'a> {
    container: &'a AuthContainer,
    ticket: Ticket,
    settled: bool,
}

impl Drop for PendingLogin<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let container = self.container;
        let cancelled = container.sequence.apply_if_current(self.ticket, || {
            container.state.send_modify(|state| state.loading = false);
        });
        if cancelled.is_some() {
            tracing::debug!(request = self.ticket, "Login cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::{ReadOnlyBackend, UnavailableBackend, WriteOnlyBackend};
    use crate::storage::{
        KeyValueBackend, MemoryBackend, ACCOUNTS_KEY, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD,
        SESSION_KEY,
    };

    fn create_test_container() -> (AuthContainer, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(SessionStore::new(backend.clone()));
        (AuthContainer::new(store, DEFAULT_LOGIN_DELAY), backend)
    }

    fn grey() -> RegisteredAccount {
        RegisteredAccount::new(
            Account::new("u_002", "Dr. Grey", "grey@healthcare.com"),
            "scalpel",
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_without_session() {
        let (auth, _backend) = create_test_container();
        let state = auth.state();

        assert!(!state.authenticated);
        assert!(state.account.is_none());
        assert!(!state.loading);
        assert_eq!(state.accounts.len(), 1);
        assert_eq!(state.accounts[0].email(), DEFAULT_ADMIN_EMAIL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_with_every_registered_account() {
        let (auth, _backend) = create_test_container();
        auth.register(grey());

        let credentials = [
            (DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD),
            ("grey@healthcare.com", "scalpel"),
        ];

        for (email, password) in credentials {
            let account = auth.login(email, password).await.unwrap();
            assert_eq!(account.email, email);

            let json = serde_json::to_value(&account).unwrap();
            assert!(json.get("password").is_none());

            let state = auth.state();
            assert!(state.authenticated);
            assert!(!state.loading);
            assert_eq!(state.account.as_ref().map(|a| a.email.as_str()), Some(email));

            auth.logout();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_takes_simulated_delay() {
        let (auth, _backend) = create_test_container();
        let started = tokio::time::Instant::now();

        auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();

        assert!(started.elapsed() >= DEFAULT_LOGIN_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_rejected() {
        let (auth, backend) = create_test_container();

        let err = auth
            .login(DEFAULT_ADMIN_EMAIL, "wrong")
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid email or password");

        let state = auth.state();
        assert!(!state.authenticated);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
        assert!(backend.get_item(SESSION_KEY).unwrap().is_none());

        auth.clear_error();
        assert!(auth.state().error.is_none());
        auth.clear_error();
        assert!(auth.state().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_email_rejected() {
        let (auth, _backend) = create_test_container();
        let err = auth
            .login("nobody@healthcare.com", DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_pending() {
        let (auth, _backend) = create_test_container();
        let mut rx = auth.subscribe();

        let login = auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD);
        let observer = async {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            assert!(state.loading);
            assert!(state.error.is_none());
            assert!(!state.authenticated);
        };

        let (result, ()) = tokio::join!(login, observer);
        assert!(result.is_ok());
        assert!(!auth.state().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_persisted_and_cleared() {
        let (auth, backend) = create_test_container();

        auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();

        let raw = backend.get_item(SESSION_KEY).unwrap().unwrap();
        assert!(!raw.contains("password"));
        let stored: Account = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.email, DEFAULT_ADMIN_EMAIL);

        auth.logout();
        assert!(backend.get_item(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_is_idempotent() {
        let (auth, _backend) = create_test_container();
        auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();

        auth.logout();
        let once = auth.state();
        auth.logout();
        let twice = auth.state();

        assert_eq!(once, twice);
        assert!(!twice.authenticated);
        assert!(twice.account.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_then_login_roundtrip() {
        let (auth, backend) = create_test_container();
        auth.register(grey());

        assert!(!auth.is_authenticated());
        assert_eq!(auth.state().accounts.len(), 2);

        let account = auth.login("grey@healthcare.com", "scalpel").await.unwrap();
        assert_eq!(account.name, "Dr. Grey");

        // A fresh container sees the registered account
        let store = Arc::new(SessionStore::new(backend));
        let reloaded = AuthContainer::new(store, DEFAULT_LOGIN_DELAY);
        assert_eq!(reloaded.state().accounts.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_email_first_entry_wins() {
        let (auth, _backend) = create_test_container();
        auth.register(RegisteredAccount::new(
            Account::new("u_dup", "Impostor", DEFAULT_ADMIN_EMAIL),
            "other",
        ));

        assert_eq!(auth.state().accounts.len(), 2);

        let account = auth
            .login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert_eq!(account.id, "u_001");

        let account = auth.login(DEFAULT_ADMIN_EMAIL, "other").await.unwrap();
        assert_eq!(account.id, "u_dup");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hydrates_persisted_session() {
        let backend = Arc::new(MemoryBackend::new());
        let account = RegisteredAccount::default_admin().into_account();
        backend
            .set_item(SESSION_KEY, &serde_json::to_string(&account).unwrap())
            .unwrap();

        let store = Arc::new(SessionStore::new(backend));
        let auth = AuthContainer::new(store, DEFAULT_LOGIN_DELAY);

        assert!(auth.is_authenticated());
        assert_eq!(auth.current_account(), Some(account));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_logins_latest_wins() {
        let (auth, _backend) = create_test_container();
        auth.register(grey());

        let first = auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD);
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            auth.login("grey@healthcare.com", "scalpel").await
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, Err(AuthError::Superseded));
        assert_eq!(second.unwrap().email, "grey@healthcare.com");

        let state = auth.state();
        assert!(state.authenticated);
        assert_eq!(state.account.unwrap().email, "grey@healthcare.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_login_cannot_undo_logout() {
        let (auth, backend) = create_test_container();

        let login = auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD);
        let logout = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            auth.logout();
        };

        let (result, ()) = tokio::join!(login, logout);

        assert_eq!(result, Err(AuthError::Superseded));
        let state = auth.state();
        assert!(!state.authenticated);
        assert!(!state.loading);
        assert!(backend.get_item(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_login_clears_loading() {
        let (auth, _backend) = create_test_container();

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD),
        )
        .await;

        assert!(outcome.is_err());
        let state = auth.state();
        assert!(!state.loading);
        assert!(!state.authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_storage_keeps_session_in_memory() {
        let store = Arc::new(SessionStore::new(Arc::new(UnavailableBackend)));
        let auth = AuthContainer::new(store.clone(), DEFAULT_LOGIN_DELAY);

        assert!(!auth.is_authenticated());
        assert_eq!(auth.state().accounts.len(), 1);

        auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(auth.is_authenticated());
        assert!(store.is_degraded());
        assert!(store.load_current_session().is_some());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(store.load_current_session().is_none());

        auth.register(grey());
        assert_eq!(store.load_accounts().len(), 2);
        auth.login("grey@healthcare.com", "scalpel").await.unwrap();
        assert_eq!(
            store.load_current_session().map(|a| a.email),
            Some("grey@healthcare.com".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_only_storage_logout_sticks() {
        let inner = Arc::new(MemoryBackend::new());
        let account = RegisteredAccount::default_admin().into_account();
        inner
            .set_item(SESSION_KEY, &serde_json::to_string(&account).unwrap())
            .unwrap();

        let store = Arc::new(SessionStore::new(Arc::new(ReadOnlyBackend { inner })));
        let auth = AuthContainer::new(store.clone(), DEFAULT_LOGIN_DELAY);
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(store.is_degraded());

        let rehydrated = AuthContainer::new(store, DEFAULT_LOGIN_DELAY);
        assert!(!rehydrated.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_storage_still_persists_writes() {
        let inner = Arc::new(MemoryBackend::new());
        let store = Arc::new(SessionStore::new(Arc::new(WriteOnlyBackend {
            inner: inner.clone(),
        })));
        let auth = AuthContainer::new(store, DEFAULT_LOGIN_DELAY);

        auth.login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(inner.get_item(SESSION_KEY).unwrap().is_some());

        auth.logout();
        assert!(inner.get_item(SESSION_KEY).unwrap().is_none());

        auth.register(grey());
        let raw = inner.get_item(ACCOUNTS_KEY).unwrap().unwrap();
        assert!(raw.contains("grey@healthcare.com"));
    }
}
