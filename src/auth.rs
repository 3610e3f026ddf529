//! Cookie based session handling: setting and clearing the auth cookie,
//! resolving it back to a user ID, and the middleware that guards routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    app_state::{AuthState, UserAuthState},
    models::{User, UserID},
    stores::UserStore,
};

/// The name of the cookie that stores the logged in user's ID.
pub(crate) const COOKIE_USER_ID: &str = "user_id";

/// How long a session lasts before the user has to log in again.
///
/// Matches the week-long sessions of the hosted service this replaces.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add the auth cookie for `user_id` to the jar.
///
/// The cookie is encrypted and signed by the jar, so the client can neither
/// read nor forge the user ID inside it.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER_ID, user_id.as_i64().to_string()))
            .path("/")
            .expires(OffsetDateTime::now_utc() + duration)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(true),
    )
}

/// Remove the auth cookie from the jar, logging the user out.
pub(crate) fn remove_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build((COOKIE_USER_ID, "")).path("/").build())
}

/// Get the ID of the logged in user from the auth cookie.
///
/// # Errors
/// Returns an [Error::Unauthorized] if the cookie is missing or does not
/// contain a user ID.
pub(crate) fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    match jar.get(COOKIE_USER_ID) {
        None => Err(Error::Unauthorized),
        Some(cookie) => cookie
            .value_trimmed()
            .parse()
            .map(UserID::new)
            .map_err(|_| Error::Unauthorized),
    }
}

/// Middleware that checks for a valid auth cookie.
///
/// If the cookie is valid the user ID is inserted into the request's
/// extensions and the request executed normally, otherwise a 401 response is
/// returned and the handler is never reached.
///
/// Route handlers behind this middleware receive the user ID with the
/// argument `Extension(user_id): Extension<UserID>`.
pub(crate) async fn auth_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar: PrivateCookieJar<Key> = PrivateCookieJar::from_request_parts(&mut parts, &state)
        .await
        .expect("could not get cookie jar from request parts");

    match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => {
            parts.extensions.insert(user_id);
            let request = Request::from_parts(parts, body);

            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}

/// Handler that returns the currently logged in user.
///
/// The static front end calls this on page load to decide whether to show
/// the log in form or the dashboard.
pub(crate) async fn get_session<U>(
    State(state): State<UserAuthState<U>>,
    jar: PrivateCookieJar,
) -> Result<Json<User>, Error>
where
    U: UserStore,
{
    let user_id = get_user_id_from_auth_cookie(&jar)?;

    // A cookie can outlive its user row if the database is reset.
    let user = state.user_store.get_by_id(user_id).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })?;

    Ok(Json(user))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::models::UserID;

    use super::{COOKIE_USER_ID, get_user_id_from_auth_cookie, remove_auth_cookie, set_auth_cookie};

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn set_cookie_stores_the_user_id() {
        let jar = get_jar();
        let user_id = UserID::new(1);

        let updated_jar = set_auth_cookie(jar, user_id, Duration::minutes(5));
        let cookie = updated_jar.get(COOKIE_USER_ID).unwrap();

        assert_eq!(cookie.value_trimmed().parse(), Ok(user_id.as_i64()));
    }

    #[test]
    fn get_user_id_round_trips_through_the_cookie() {
        let user_id = UserID::new(1);
        let jar = set_auth_cookie(get_jar(), user_id, Duration::minutes(5));

        let retrieved_user_id = get_user_id_from_auth_cookie(&jar).unwrap();

        assert_eq!(retrieved_user_id, user_id);
    }

    #[test]
    fn get_user_id_fails_without_a_cookie() {
        assert!(get_user_id_from_auth_cookie(&get_jar()).is_err());
    }

    #[test]
    fn remove_cookie_logs_the_user_out() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(5));

        let jar = remove_auth_cookie(jar);

        assert!(get_user_id_from_auth_cookie(&jar).is_err());
    }
}
