//! The log in endpoint: verifies credentials and sets the auth cookie.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    app_state::UserAuthState,
    auth::set_auth_cookie,
    stores::UserStore,
};

/// The credentials sent by the log in form.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during log in.
    pub email: EmailAddress,
    /// Password entered during log in.
    pub password: String,
}

/// Handler for log in requests.
///
/// A successful log in responds with the auth cookie set. An unknown email
/// and a wrong password produce the same 401 response, so the endpoint does
/// not reveal which emails are registered.
///
/// # Errors
/// Returns an [Error::InvalidCredentials] if the email is not registered or
/// the password does not match.
pub async fn post_log_in<U>(
    State(state): State<UserAuthState<U>>,
    jar: PrivateCookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<PrivateCookieJar, Error>
where
    U: UserStore,
{
    let user = state
        .user_store
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => {
                tracing::error!("Error retrieving user during log in: {error}");
                error
            }
        })?;

    if user.password_hash().verify(&credentials.password)? {
        Ok(set_auth_cookie(jar, user.id(), state.cookie_duration))
    } else {
        Err(Error::InvalidCredentials)
    }
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{auth::COOKIE_USER_ID, build_router, endpoints, stores::sqlite::create_app_state};

    fn get_test_server() -> TestServer {
        let state = create_app_state(Connection::open_in_memory().unwrap(), "foobar").unwrap();
        let app = build_router(state);

        TestServer::new(app)
    }

    async fn register_test_user(server: &TestServer, email: &str, password: &str) {
        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Test User",
                "email": email,
                "password": password,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz", "averysafeandsecurepassword").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();
        assert!(!response.cookie(COOKIE_USER_ID).value().is_empty());
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz", "averysafeandsecurepassword").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "wrong@email.com",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz", "averysafeandsecurepassword").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_test_server();

        let response = server.post(endpoints::LOG_IN).await;

        assert!(response.status_code().is_client_error());
    }
}
