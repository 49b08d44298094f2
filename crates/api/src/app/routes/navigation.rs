//! Navigation guard endpoints.
//!
//! The excluded UI layer calls these before rendering a route: `check`
//! answers allow/deny for one path, `menu` enumerates everything the role
//! can open (overrides applied).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
};

use crate::app::dto::{NavigationCheckQuery, NavigationDecision};
use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/check", get(check))
        .route("/menu", get(menu))
}

/// GET /navigation/check?path=/models/3/edit
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<NavigationCheckQuery>,
) -> axum::response::Response {
    match services
        .engine
        .can_access(&query.path, Some(principal.role()))
        .await
    {
        Ok(allowed) => Json(NavigationDecision {
            path: query.path,
            allowed,
        })
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /navigation/menu
pub async fn menu(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.engine.accessible_resources(principal.role()).await {
        Ok(resources) => Json(serde_json::json!({ "resources": resources })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
