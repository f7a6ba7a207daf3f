use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_FAILED_SIGN_INS: u32 = 5;

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    TooManyRequests,
    EmailAlreadyInUse,
    WeakPassword,
}

impl AuthErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::UserNotFound => "No account exists with this email",
            AuthErrorKind::WrongPassword => "Incorrect password",
            AuthErrorKind::InvalidEmail => "Invalid email address",
            AuthErrorKind::TooManyRequests => "Too many attempts. Try again later",
            AuthErrorKind::EmailAlreadyInUse => "An account already exists with this email",
            AuthErrorKind::WeakPassword => "Password should be at least 6 characters",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", .kind.message())]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

/// Resolves credentials to a user. The session only needs to know whether
/// someone is signed in; everything else is up to the provider.
pub trait IdentityProvider {
    /// Register a new account and sign it in.
    fn sign_up(&mut self, email: &str, password: &str) -> Result<User, AuthError>;

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError>;
}

#[derive(Debug)]
struct Account {
    user: User,
    password_digest: String,
    failed_attempts: u32,
}

/// Identity provider backed by a map of accounts held in memory.
/// Passwords are kept as salted SHA-256 digests, never in clear text.
#[derive(Debug, Default)]
pub struct LocalIdentityProvider {
    accounts: HashMap<String, Account>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_up(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email)?;

        if self.accounts.contains_key(&email) {
            return Err(AuthErrorKind::EmailAlreadyInUse.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthErrorKind::WeakPassword.into());
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
        };
        let account = Account {
            user: user.clone(),
            password_digest: password_digest(&email, password),
            failed_attempts: 0,
        };
        self.accounts.insert(email, account);

        info!(user_id = %user.id, "Registered account");
        Ok(user)
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email)?;
        let digest = password_digest(&email, password);

        let account = self
            .accounts
            .get_mut(&email)
            .ok_or(AuthError::from(AuthErrorKind::UserNotFound))?;

        if account.failed_attempts >= MAX_FAILED_SIGN_INS {
            warn!(user_id = %account.user.id, "Sign-in blocked after repeated failures");
            return Err(AuthErrorKind::TooManyRequests.into());
        }

        if account.password_digest != digest {
            account.failed_attempts += 1;
            warn!(
                user_id = %account.user.id,
                failed_attempts = account.failed_attempts,
                "Sign-in failed"
            );
            return Err(AuthErrorKind::WrongPassword.into());
        }

        account.failed_attempts = 0;
        Ok(account.user.clone())
    }
}

/// Lowercase and validate an email address: one '@', a non-empty local part
/// and a dotted domain, no whitespace.
fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let invalid = || AuthError::from(AuthErrorKind::InvalidEmail);

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }

    Ok(email)
}

fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_then_sign_in() {
        let mut provider = LocalIdentityProvider::new();
        let registered = provider.sign_up("Ana@Example.com", "secret1").unwrap();
        assert_eq!(registered.email, "ana@example.com");

        let signed_in = provider.sign_in("ana@example.com ", "secret1").unwrap();
        assert_eq!(signed_in, registered);
    }

    #[test]
    fn test_sign_up_errors() {
        let mut provider = LocalIdentityProvider::new();
        provider.sign_up("ana@example.com", "secret1").unwrap();

        let kind = |r: Result<User, AuthError>| r.unwrap_err().kind;
        assert_eq!(
            kind(provider.sign_up("ANA@example.com", "another1")),
            AuthErrorKind::EmailAlreadyInUse
        );
        assert_eq!(
            kind(provider.sign_up("ben@example.com", "12345")),
            AuthErrorKind::WeakPassword
        );
        assert_eq!(
            kind(provider.sign_up("not-an-email", "secret1")),
            AuthErrorKind::InvalidEmail
        );
        assert_eq!(provider.account_count(), 1);
    }

    #[test]
    fn test_email_validation() {
        assert!(normalize_email("a@b.co").is_ok());
        for bad in ["", "@b.co", "a@", "a@b", "a@b..co", "a b@c.co", "a@b@c.co", "a@.co"] {
            assert!(normalize_email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_sign_in_errors() {
        let mut provider = LocalIdentityProvider::new();
        provider.sign_up("ana@example.com", "secret1").unwrap();

        assert_eq!(
            provider.sign_in("ben@example.com", "secret1").unwrap_err().kind,
            AuthErrorKind::UserNotFound
        );
        assert_eq!(
            provider.sign_in("ana@example.com", "wrong").unwrap_err().kind,
            AuthErrorKind::WrongPassword
        );
    }

    #[test]
    fn test_lockout_after_repeated_failures() {
        let mut provider = LocalIdentityProvider::new();
        provider.sign_up("ana@example.com", "secret1").unwrap();

        for _ in 0..MAX_FAILED_SIGN_INS {
            assert_eq!(
                provider.sign_in("ana@example.com", "nope").unwrap_err().kind,
                AuthErrorKind::WrongPassword
            );
        }
        assert_eq!(
            provider.sign_in("ana@example.com", "secret1").unwrap_err().kind,
            AuthErrorKind::TooManyRequests
        );
    }

    #[test]
    fn test_successful_sign_in_resets_failures() {
        let mut provider = LocalIdentityProvider::new();
        provider.sign_up("ana@example.com", "secret1").unwrap();

        for _ in 0..MAX_FAILED_SIGN_INS - 1 {
            let _ = provider.sign_in("ana@example.com", "nope");
        }
        provider.sign_in("ana@example.com", "secret1").unwrap();
        let _ = provider.sign_in("ana@example.com", "nope");
        assert!(provider.sign_in("ana@example.com", "secret1").is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = AuthError::from(AuthErrorKind::WeakPassword);
        assert_eq!(err.to_string(), "Password should be at least 6 characters");
    }
}
