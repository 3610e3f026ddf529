//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    app_state::AuthState,
    auth::{auth_guard, get_session},
    endpoints,
    log_in::post_log_in,
    log_out::post_log_out,
    register_user::register_user,
    stores::{TransactionStore, UserStore},
    summary::get_summary,
    transactions::{create_transaction, get_transactions},
};

/// Return a router with all the app's routes.
///
/// Requests that match no route fall back to the static file service, which
/// serves the single page front end from `static/`.
pub fn build_router<T, U>(state: AppState<T, U>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let auth_state = AuthState::from_ref(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_user::<U>))
        .route(endpoints::LOG_IN, post(post_log_in::<U>))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::SESSION, get(get_session::<U>));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions::<T>).post(create_transaction::<T>),
        )
        .route(endpoints::SUMMARY, get(get_summary::<T>))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .with_state(state)
        .fallback_service(ServeDir::new("static"))
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    StatusCode::IM_A_TEAPOT.into_response()
}
