//! Implements the structs that hold the state of the server.
//!
//! Each group of route handlers declares a smaller state struct with only
//! the fields it needs, extracted from [AppState] via `FromRef`.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::auth::DEFAULT_COOKIE_DURATION;

/// The state of the server.
///
/// Generic over the store implementations so that tests can substitute their
/// own; production code uses
/// [SqliteAppState](crate::stores::sqlite::SqliteAppState).
#[derive(Clone)]
pub struct AppState<T, U> {
    /// The key used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the auth cookie is valid.
    pub cookie_duration: Duration,
    /// The store for managing [transactions](crate::models::Transaction).
    pub transaction_store: T,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
}

impl<T, U> AppState<T, U> {
    /// Create a new [AppState].
    ///
    /// The cookie key is derived from `cookie_secret`, so the same secret
    /// must be used across restarts for existing sessions to stay valid.
    pub fn new(cookie_secret: &str, transaction_store: T, user_store: U) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            transaction_store,
            user_store,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<T, U> FromRef<AppState<T, U>> for Key {
    fn from_ref(state: &AppState<T, U>) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

/// The state needed by the auth middleware and the log out handler.
#[derive(Clone)]
pub struct AuthState {
    /// The key used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the auth cookie is valid.
    pub cookie_duration: Duration,
}

impl<T, U> FromRef<AppState<T, U>> for AuthState {
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// The state needed to list, create and summarize transactions.
#[derive(Clone)]
pub struct TransactionState<T> {
    /// The store for managing [transactions](crate::models::Transaction).
    pub transaction_store: T,
}

impl<T, U> FromRef<AppState<T, U>> for TransactionState<T>
where
    T: Clone,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The state needed to register and log in users.
#[derive(Clone)]
pub struct UserAuthState<U> {
    /// The key used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the auth cookie is valid.
    pub cookie_duration: Duration,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
}

impl<T, U> FromRef<AppState<T, U>> for UserAuthState<U>
where
    U: Clone,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            user_store: state.user_store.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<U> FromRef<UserAuthState<U>> for Key {
    fn from_ref(state: &UserAuthState<U>) -> Self {
        state.cookie_key.clone()
    }
}
