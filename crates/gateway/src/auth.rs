use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use common::UserId;
use domain::{AuthIdentity, Provider, ProviderId, Timestamp};

use crate::error::AuthErrorCode;
use crate::{GatewayError, Result};

/// How long a sign-in survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Survives restarts until explicit sign-out.
    Local,
    /// Cleared when the session ends.
    Session,
    /// Kept in memory only.
    None,
}

/// Account lifecycle operations of the external identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates an email/password account. The new account is signed in.
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    /// Signs in through a federated provider.
    async fn sign_in_with_provider(&self, provider: Provider) -> Result<AuthIdentity>;

    async fn sign_out(&self) -> Result<()>;

    /// Sends a password reset email.
    async fn password_reset(&self, email: &str) -> Result<()>;

    async fn set_persistence(&self, persistence: Persistence) -> Result<()>;

    /// Confirms the current user's password before a sensitive change.
    async fn reauthenticate(&self, current_password: &str) -> Result<()>;

    async fn update_password(&self, new_password: &str) -> Result<()>;

    async fn update_email(&self, new_email: &str) -> Result<()>;

    /// The currently signed-in identity, if any.
    async fn current_user(&self) -> Option<AuthIdentity>;
}

#[derive(Debug, Clone)]
struct Account {
    uid: UserId,
    password: String,
    creation_time: Timestamp,
}

#[derive(Debug, Default)]
struct InMemoryAuthState {
    accounts: HashMap<String, Account>,
    federated: HashMap<Provider, AuthIdentity>,
    current: Option<AuthIdentity>,
    persistence: Option<Persistence>,
    reset_emails: Vec<String>,
    offline: bool,
    fail_on_sign_out: bool,
}

/// In-memory identity provider for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthProvider {
    state: Arc<Mutex<InMemoryAuthState>>,
}

const MIN_PASSWORD_LEN: usize = 6;

impl InMemoryAuthProvider {
    /// Creates a new in-memory identity provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryAuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(state: &InMemoryAuthState) -> Result<()> {
        if state.offline {
            return Err(GatewayError::auth(AuthErrorCode::NetworkRequestFailed));
        }
        Ok(())
    }

    /// Registers the profile a federated provider returns on sign-in.
    pub fn register_federated(&self, provider: Provider, identity: AuthIdentity) {
        self.state().federated.insert(provider, identity);
    }

    /// Makes every call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Configures sign-out to fail.
    pub fn set_fail_on_sign_out(&self, fail: bool) {
        self.state().fail_on_sign_out = fail;
    }

    /// Returns true if an account exists for the email.
    pub fn has_account(&self, email: &str) -> bool {
        self.state().accounts.contains_key(email)
    }

    /// Emails that password resets were sent to.
    pub fn reset_emails(&self) -> Vec<String> {
        self.state().reset_emails.clone()
    }

    pub fn persistence(&self) -> Option<Persistence> {
        self.state().persistence
    }

    fn password_identity(email: &str, account: &Account) -> AuthIdentity {
        AuthIdentity {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
            provider_id: ProviderId::Password,
            creation_time: Some(account.creation_time.clone()),
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        let mut state = self.state();
        Self::check_online(&state)?;

        if state.accounts.contains_key(email) {
            return Err(GatewayError::auth(AuthErrorCode::EmailAlreadyInUse));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::auth(AuthErrorCode::WeakPassword));
        }

        let account = Account {
            uid: UserId::generate(),
            password: password.to_string(),
            creation_time: Timestamp::millis_now(),
        };
        let identity = Self::password_identity(email, &account);
        state.accounts.insert(email.to_string(), account);
        state.current = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        let mut state = self.state();
        Self::check_online(&state)?;

        let account = state
            .accounts
            .get(email)
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::UserNotFound))?;
        if account.password != password {
            return Err(GatewayError::auth(AuthErrorCode::WrongPassword));
        }

        let identity = Self::password_identity(email, account);
        state.current = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in_with_provider(&self, provider: Provider) -> Result<AuthIdentity> {
        let mut state = self.state();
        Self::check_online(&state)?;

        let identity = state
            .federated
            .get(&provider)
            .cloned()
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::PopupClosedByUser))?;
        state.current = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state();
        Self::check_online(&state)?;
        if state.fail_on_sign_out {
            return Err(GatewayError::Unavailable("sign-out failed".to_string()));
        }
        state.current = None;
        Ok(())
    }

    async fn password_reset(&self, email: &str) -> Result<()> {
        let mut state = self.state();
        Self::check_online(&state)?;
        if !state.accounts.contains_key(email) {
            return Err(GatewayError::auth(AuthErrorCode::UserNotFound));
        }
        state.reset_emails.push(email.to_string());
        Ok(())
    }

    async fn set_persistence(&self, persistence: Persistence) -> Result<()> {
        let mut state = self.state();
        Self::check_online(&state)?;
        state.persistence = Some(persistence);
        Ok(())
    }

    async fn reauthenticate(&self, current_password: &str) -> Result<()> {
        let state = self.state();
        Self::check_online(&state)?;
        let email = state
            .current
            .as_ref()
            .map(|identity| identity.email.clone())
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::UserNotFound))?;
        match state.accounts.get(&email) {
            Some(account) if account.password == current_password => Ok(()),
            Some(_) => Err(GatewayError::auth(AuthErrorCode::WrongPassword)),
            None => Err(GatewayError::auth(AuthErrorCode::UserNotFound)),
        }
    }

    async fn update_password(&self, new_password: &str) -> Result<()> {
        let mut state = self.state();
        Self::check_online(&state)?;
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::auth(AuthErrorCode::WeakPassword));
        }
        let email = state
            .current
            .as_ref()
            .map(|identity| identity.email.clone())
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::RequiresRecentLogin))?;
        let account = state
            .accounts
            .get_mut(&email)
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::UserNotFound))?;
        account.password = new_password.to_string();
        Ok(())
    }

    async fn update_email(&self, new_email: &str) -> Result<()> {
        let mut state = self.state();
        Self::check_online(&state)?;
        if state.accounts.contains_key(new_email) {
            return Err(GatewayError::auth(AuthErrorCode::EmailAlreadyInUse));
        }
        let current = state
            .current
            .clone()
            .ok_or_else(|| GatewayError::auth(AuthErrorCode::RequiresRecentLogin))?;
        if let Some(account) = state.accounts.remove(&current.email) {
            state.accounts.insert(new_email.to_string(), account);
        }
        state.current = Some(AuthIdentity {
            email: new_email.to_string(),
            ..current
        });
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthIdentity> {
        self.state().current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_sign_in() {
        let auth = InMemoryAuthProvider::new();
        let created = auth.create_account("a@b.c", "secret1").await.unwrap();
        assert_eq!(created.provider_id, ProviderId::Password);

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().await.is_none());

        let signed_in = auth.sign_in("a@b.c", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(auth.current_user().await, Some(signed_in));
    }

    #[tokio::test]
    async fn test_sign_in_errors() {
        let auth = InMemoryAuthProvider::new();
        auth.create_account("a@b.c", "secret1").await.unwrap();

        let wrong = auth.sign_in("a@b.c", "nope").await.unwrap_err();
        assert_eq!(wrong.auth_code(), Some(&AuthErrorCode::WrongPassword));

        let missing = auth.sign_in("x@b.c", "secret1").await.unwrap_err();
        assert_eq!(missing.auth_code(), Some(&AuthErrorCode::UserNotFound));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let auth = InMemoryAuthProvider::new();
        auth.create_account("a@b.c", "secret1").await.unwrap();
        let err = auth.create_account("a@b.c", "secret2").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(&AuthErrorCode::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn test_unregistered_federated_provider_closes_popup() {
        let auth = InMemoryAuthProvider::new();
        let err = auth.sign_in_with_provider(Provider::Github).await.unwrap_err();
        assert_eq!(err.auth_code(), Some(&AuthErrorCode::PopupClosedByUser));
    }

    #[tokio::test]
    async fn test_offline_fails_with_network_error() {
        let auth = InMemoryAuthProvider::new();
        auth.set_offline(true);
        let err = auth.sign_in("a@b.c", "secret1").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(&AuthErrorCode::NetworkRequestFailed));
    }

    #[tokio::test]
    async fn test_reauthenticate_and_update_password() {
        let auth = InMemoryAuthProvider::new();
        auth.create_account("a@b.c", "secret1").await.unwrap();

        assert!(auth.reauthenticate("bad").await.is_err());
        auth.reauthenticate("secret1").await.unwrap();
        auth.update_password("secret2").await.unwrap();

        auth.sign_out().await.unwrap();
        auth.sign_in("a@b.c", "secret2").await.unwrap();
    }
}
