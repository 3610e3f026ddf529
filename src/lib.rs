//! Fintrack is a web app for tracking personal income and expenses.
//!
//! This library provides a JSON REST API for registering users, logging in
//! with cookie sessions, recording transactions and summarizing them, plus a
//! static single page front end that drives the API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod db;
mod endpoints;
mod log_in;
mod log_out;
mod logging;
pub mod models;
mod register_user;
mod routing;
pub mod stores;
mod summary;
mod transactions;

pub use app_state::{AppState, create_cookie_key};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use summary::Summary;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request has no valid session cookie. Maps to 401 at the HTTP
    /// boundary.
    #[error("the request has no valid session cookie")]
    Unauthorized,

    /// The user provided an email and password combination that does not
    /// match a registered user. Deliberately does not say which of the two
    /// was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A request field failed validation.
    ///
    /// `field` names the offending input field and `message` says what an
    /// acceptable value looks like. Both are sent to the client.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// The name of the field that failed validation, e.g. "amount".
        field: &'static str,
        /// What an acceptable value for the field looks like.
        message: String,
    },

    /// The user provided a password that is too easy to guess.
    ///
    /// The error string explains what would make the password stronger.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email used to register is already in use.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred in the password hashing library.
    ///
    /// The error string should only be logged on the server. Clients get a
    /// general internal server error instead.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized" }),
            ),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid email or password" }),
            ),
            Error::InvalidField { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid data",
                    "details": { "field": field, "message": message },
                }),
            ),
            Error::TooWeak(message) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid data",
                    "details": { "field": "password", "message": message },
                }),
            ),
            Error::DuplicateEmail => (
                StatusCode::CONFLICT,
                json!({ "error": "the email is already in use" }),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "the requested resource could not be found" }),
            ),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
