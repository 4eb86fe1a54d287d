use axum::{routing::get, Router};

/// Keep-alive surface for the hosting platform's liveness check. Deliberately
/// stateless: the watch loop owns everything mutable, and the two tasks share
/// nothing but process lifetime.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(|| async { "Bot is running!" }))
        .route("/health", get(|| async { "ok" }))
}
