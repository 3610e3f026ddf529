//! The URIs of the API endpoints.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";
/// The route for registering new users.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/log_in";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/api/auth/log_out";
/// The route for checking who is currently logged in.
pub const SESSION: &str = "/api/auth/session";
/// The route for listing and creating the current user's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the aggregate totals of the current user's transactions.
pub const SUMMARY: &str = "/api/summary";
