//! Permission settings endpoints.
//!
//! Reads power the comparison screen (defaults vs effective grants per
//! customizable role); writes replace one role's override map wholesale or
//! delete it. Every write against the Administrator role is rejected with
//! an authorization error, both here and again at the store boundary.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use dealerdesk_auth::Role;

use crate::app::dto::{RoleOverridesResponse, SaveOverridesRequest};
use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", get(report)).route(
        "/:role",
        get(get_overrides).post(save_overrides).delete(reset_overrides),
    )
}

/// The permission settings screen itself is a guarded resource; viewing it
/// goes through the same engine as any navigation.
async fn ensure_can_view(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<(), axum::response::Response> {
    match services
        .engine
        .can_access("/settings/permissions", Some(principal.role()))
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "permission settings are not accessible to this role",
        )),
        Err(e) => Err(errors::domain_error_to_response(e)),
    }
}

/// Writes are stricter than views: customizing grants is an administrator
/// action, full stop, and cannot itself be granted away via overrides.
fn ensure_administrator(principal: &PrincipalContext) -> Result<(), axum::response::Response> {
    if principal.role().is_administrator() {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "only administrators may change permissions",
        ))
    }
}

fn parse_role(name: &str) -> Result<Role, axum::response::Response> {
    Role::parse(name).ok_or_else(|| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_role",
            format!("unknown role '{name}'"),
        )
    })
}

/// GET /permissions - the full comparison report, de-duplicated by
/// functionality description.
pub async fn report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_view(&services, &principal).await {
        return response;
    }

    match services.engine.comparison_report().await {
        Ok(report) => Json(serde_json::json!({ "functionalities": report })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /permissions/:role - one role's raw override record.
pub async fn get_overrides(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(role_name): Path<String>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_view(&services, &principal).await {
        return response;
    }

    let role = match parse_role(&role_name) {
        Ok(role) => role,
        Err(response) => return response,
    };

    match services.store.get(role).await {
        Ok(overrides) => Json(RoleOverridesResponse { role, overrides }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /permissions/:role - wholesale replacement of the role's map.
pub async fn save_overrides(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(role_name): Path<String>,
    Json(body): Json<SaveOverridesRequest>,
) -> axum::response::Response {
    if let Err(response) = ensure_administrator(&principal) {
        return response;
    }

    let role = match parse_role(&role_name) {
        Ok(role) => role,
        Err(response) => return response,
    };

    match services.store.save(role, body.permissions).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// DELETE /permissions/:role - restore matrix defaults by deleting the
/// record (idempotent).
pub async fn reset_overrides(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(role_name): Path<String>,
) -> axum::response::Response {
    if let Err(response) = ensure_administrator(&principal) {
        return response;
    }

    let role = match parse_role(&role_name) {
        Ok(role) => role,
        Err(response) => return response,
    };

    match services.store.reset(role).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
