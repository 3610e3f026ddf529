//! The registration endpoint: validates the sign up form, stores the new
//! user and logs them straight in.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    app_state::UserAuthState,
    auth::set_auth_cookie,
    models::{PasswordHash, User, ValidatedPassword},
    stores::UserStore,
};

/// The minimum number of characters for a user's display name.
const NAME_MIN_LENGTH: usize = 2;

/// The raw body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    /// The display name for the new user.
    pub name: String,
    /// The email address to register.
    pub email: String,
    /// The password in plain text. Hashed before it is stored.
    pub password: String,
}

/// Handler for registration requests.
///
/// On success the new user is logged in immediately, mirroring the sign up
/// flow of the hosted service this replaces: the response carries both the
/// auth cookie and the public part of the user record.
///
/// # Errors
/// Returns an [Error::InvalidField] if the name or email is invalid, an
/// [Error::TooWeak] if the password is too easy to guess, or an
/// [Error::DuplicateEmail] if the email is already registered.
pub async fn register_user<U>(
    State(mut state): State<UserAuthState<U>>,
    jar: PrivateCookieJar,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, PrivateCookieJar, Json<User>), Error>
where
    U: UserStore,
{
    if payload.name.trim().chars().count() < NAME_MIN_LENGTH {
        return Err(Error::InvalidField {
            field: "name",
            message: format!("Name must be at least {NAME_MIN_LENGTH} characters"),
        });
    }

    let email = payload
        .email
        .parse::<EmailAddress>()
        .map_err(|_| Error::InvalidField {
            field: "email",
            message: "Invalid email address".to_owned(),
        })?;

    let password = ValidatedPassword::new(&payload.password)?;
    let password_hash = PasswordHash::new(&password, PasswordHash::DEFAULT_COST)?;

    let user = state
        .user_store
        .create(payload.name.trim().to_owned(), email, password_hash)?;

    let jar = set_auth_cookie(jar, user.id(), state.cookie_duration);

    Ok((StatusCode::CREATED, jar, Json(user)))
}
