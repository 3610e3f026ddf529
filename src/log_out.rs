//! The log out endpoint: clears the auth cookie.

use axum_extra::extract::PrivateCookieJar;

use crate::auth::remove_auth_cookie;

/// Handler for log out requests.
///
/// Always succeeds, even when no one is logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> PrivateCookieJar {
    remove_auth_cookie(jar)
}

#[cfg(test)]
mod log_out_tests {
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

    #[tokio::test]
    async fn log_out_clears_the_session() {
        let server = get_test_server();

        let auth_cookie = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Test User",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .cookie(COOKIE_USER_ID);

        let response = server.post(endpoints::LOG_OUT).add_cookie(auth_cookie).await;

        response.assert_status_ok();
        assert!(response.cookie(COOKIE_USER_ID).value().is_empty());

        // The cleared cookie no longer grants access to protected routes.
        let cleared_cookie = response.cookie(COOKIE_USER_ID);
        server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cleared_cookie)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_out_succeeds_without_a_session() {
        let server = get_test_server();

        server.post(endpoints::LOG_OUT).await.assert_status_ok();
    }
}
