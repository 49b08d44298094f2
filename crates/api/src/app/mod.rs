//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: infrastructure wiring (matrix, override store, catalog)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from environment wiring (used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services().await?);
    Ok(build_app_with(jwt_secret, services))
}

/// Build the router around pre-wired services (tests inject their own
/// catalog and override store here).
pub fn build_app_with(jwt_secret: String, services: Arc<services::AppServices>) -> Router {
    let jwt = Arc::new(dealerdesk_auth::Hs256JwtValidator::new(
        jwt_secret.into_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid token + role context.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
