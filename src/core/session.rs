//! Client-side session gate
//!
//! A syntactically valid lower-case email and any non-empty password switch
//! the app to the main view. Nothing is verified against a credential
//! store; this only toggles which view is shown.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::{LocalStore, StoreError};

/// Store key holding the logged in user
pub const SESSION_KEY: &str = "portfolio_logged_in_user";

const EMAIL_PATTERN: &str = r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Please enter both email and password.")]
    MissingCredentials,
    #[error("Email must be in lowercase letters only.")]
    NotLowercase,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persisted session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn { email: String },
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn { .. })
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Check login input, returning the trimmed email on success
pub fn validate_credentials(email: &str, password: &str) -> Result<String, LoginError> {
    let email = email.trim();
    let password = password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }
    if email != email.to_lowercase() {
        return Err(LoginError::NotLowercase);
    }
    if !email_regex().is_match(email) {
        return Err(LoginError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// Reads the session state from the store
pub fn restore<S: LocalStore>(store: &S) -> SessionState {
    match store.get(SESSION_KEY) {
        Ok(Some(raw)) => {
            // Presence alone means logged in, the payload is informational
            let email = serde_json::from_str::<SessionRecord>(&raw)
                .map(|record| record.email)
                .unwrap_or_default();
            SessionState::LoggedIn { email }
        }
        Ok(None) => SessionState::LoggedOut,
        Err(e) => {
            tracing::warn!("Failed to read session: {}", e);
            SessionState::LoggedOut
        }
    }
}

/// Validate the input and persist the session
pub fn login<S: LocalStore>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<SessionState, LoginError> {
    let email = validate_credentials(email, password)?;
    let record = SessionRecord {
        email: email.clone(),
    };
    let json = serde_json::to_string(&record).map_err(|source| StoreError::Serialize {
        key: SESSION_KEY.to_string(),
        source,
    })?;
    store.set(SESSION_KEY, &json)?;

    tracing::info!("Logged in as {}", email);
    Ok(SessionState::LoggedIn { email })
}

/// Drop the persisted session
pub fn logout<S: LocalStore>(store: &S) -> Result<SessionState, StoreError> {
    store.remove(SESSION_KEY)?;
    tracing::info!("Logged out");
    Ok(SessionState::LoggedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    #[test]
    fn test_uppercase_email_rejected() {
        assert!(matches!(
            validate_credentials("Foo@Bar.com", "secret"),
            Err(LoginError::NotLowercase)
        ));
    }

    #[test]
    fn test_missing_tld_rejected() {
        assert!(matches!(
            validate_credentials("foo@bar", "secret"),
            Err(LoginError::InvalidEmail)
        ));
        assert!(matches!(
            validate_credentials("foo@bar.c", "secret"),
            Err(LoginError::InvalidEmail)
        ));
    }

    #[test]
    fn test_missing_password_rejected() {
        assert!(matches!(
            validate_credentials("foo@bar.com", "   "),
            Err(LoginError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials("", "pw"),
            Err(LoginError::MissingCredentials)
        ));
    }

    #[test]
    fn test_login_persists_session() {
        let store = MemoryStore::new();
        assert_eq!(restore(&store), SessionState::LoggedOut);

        let state = login(&store, " foo@bar.com ", "pw").unwrap();
        assert_eq!(
            state,
            SessionState::LoggedIn {
                email: "foo@bar.com".into()
            }
        );
        assert_eq!(
            store.get(SESSION_KEY).unwrap().as_deref(),
            Some(r#"{"email":"foo@bar.com"}"#)
        );
        assert!(restore(&store).is_logged_in());
    }

    #[test]
    fn test_failed_login_leaves_store_untouched() {
        let store = MemoryStore::new();
        assert!(login(&store, "Foo@Bar.com", "pw").is_err());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_clears_session() {
        let store = MemoryStore::new();
        login(&store, "foo@bar.com", "pw").unwrap();
        assert_eq!(logout(&store).unwrap(), SessionState::LoggedOut);
        assert_eq!(restore(&store), SessionState::LoggedOut);
    }

    #[test]
    fn test_unparseable_session_still_counts() {
        let store = MemoryStore::new();
        store.set(SESSION_KEY, "garbage").unwrap();
        assert!(restore(&store).is_logged_in());
    }
}
