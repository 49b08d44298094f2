//! Configurator endpoints: selection data and live quoting.
//!
//! The quote handler is deliberately forgiving about numeric input (the
//! preview must always render a number); the order handler is where
//! validation becomes strict.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use dealerdesk_core::{DomainError, DomainResult, VersionId};
use dealerdesk_pricing::{Quote, SelectedColor};

use crate::app::dto::{
    BrandOptions, ColorOption, ModelOptions, OptionalOption, QuoteDisplay, QuoteRequest,
    QuoteResponse, VersionOptionsResponse, VersionSummary,
};
use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/options", get(options))
        .route("/versions/:id/options", get(version_options))
        .route("/quote", post(quote))
        .route("/order", post(order))
}

async fn ensure_can_configure(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<(), axum::response::Response> {
    match services
        .engine
        .can_access("/configurator", Some(principal.role()))
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "the configurator is not accessible to this role",
        )),
        Err(e) => Err(errors::domain_error_to_response(e)),
    }
}

/// GET /configurator/options - the brand → model → version cascade.
pub async fn options(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_configure(&services, &principal).await {
        return response;
    }

    match selection_tree(&services) {
        Ok(brands) => Json(serde_json::json!({ "brands": brands })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn selection_tree(services: &AppServices) -> DomainResult<Vec<BrandOptions>> {
    let mut tree = Vec::new();

    for brand in services.catalog.brands()? {
        let mut models = Vec::new();
        for model in services.catalog.models_of(brand.id)? {
            let versions = services
                .catalog
                .versions_of(model.id)?
                .into_iter()
                .map(|version| VersionSummary {
                    id: version.id,
                    name: version.name,
                    base_public_price: version.base_public_price,
                })
                .collect();
            models.push(ModelOptions {
                id: model.id,
                name: model.name,
                versions,
            });
        }
        tree.push(BrandOptions {
            id: brand.id,
            name: brand.name,
            models,
        });
    }

    Ok(tree)
}

/// GET /configurator/versions/:id/options - colors and optionals with the
/// prices this version actually charges.
pub async fn version_options(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(version_id): Path<VersionId>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_configure(&services, &principal).await {
        return response;
    }

    match build_version_options(&services, version_id) {
        Ok(response) => Json(response).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn build_version_options(
    services: &AppServices,
    version_id: VersionId,
) -> DomainResult<VersionOptionsResponse> {
    let version = services.catalog.version(version_id)?;

    let mut colors = Vec::new();
    for color in services.catalog.colors()? {
        let paint_type = services.catalog.paint_type(color.paint_type_id)?;
        let price = services.catalog.color_price(version_id, color.id)?;
        colors.push(ColorOption {
            color_id: color.id,
            name: color.name,
            paint_type_id: paint_type.id,
            paint_type: paint_type.name,
            price,
        });
    }

    let mut optionals = Vec::new();
    for association in services.catalog.version_optionals(version_id)? {
        let optional = services.catalog.optional(association.optional_id)?;
        optionals.push(OptionalOption {
            optional_id: optional.id,
            name: optional.name,
            price: association.price,
        });
    }

    Ok(VersionOptionsResponse {
        version: VersionSummary {
            id: version.id,
            name: version.name,
            base_public_price: version.base_public_price,
        },
        exemption_tiers: version.exemption_tiers,
        colors,
        optionals,
    })
}

/// POST /configurator/quote - recompute the live breakdown.
pub async fn quote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(request): Json<QuoteRequest>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_configure(&services, &principal).await {
        return response;
    }

    match assemble_quote(&services, &request) {
        Ok((_, response)) => Json(response).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /configurator/order - same assembly, strict at the boundary:
/// a malformed or non-positive quantity is a validation error here.
pub async fn order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(request): Json<QuoteRequest>,
) -> axum::response::Response {
    if let Err(response) = ensure_can_configure(&services, &principal).await {
        return response;
    }

    let result = assemble_quote(&services, &request).and_then(|(mut quote, _)| {
        if let Some(raw) = &request.quantity {
            let quantity: i64 = raw
                .trim()
                .parse()
                .map_err(|_| DomainError::validation("quantity must be a whole number"))?;
            quote.set_quantity(quantity);
        }
        quote.validate_for_order()?;
        quote_response(&services, &quote)
    });

    match result {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Resolve catalog prices and apply the request to a fresh quote.
fn assemble_quote(
    services: &AppServices,
    request: &QuoteRequest,
) -> DomainResult<(Quote, QuoteResponse)> {
    let version = services.catalog.version(request.version_id)?;

    let mut quote = Quote::new();
    quote.select_version(&version);

    if let Some(color_id) = request.color_id {
        let price = services.catalog.color_price(version.id, color_id)?;
        quote.select_color(Some(SelectedColor { color_id, price }));
    }

    for optional_id in &request.optional_ids {
        let price = services.catalog.optional_price(version.id, *optional_id)?;
        quote.add_optional(*optional_id, price);
    }

    // The field the user edited last is authoritative for the pair.
    if let Some(amount) = &request.discount_amount {
        quote.set_discount_amount_input(amount);
    } else if let Some(percent) = &request.discount_percent {
        quote.set_discount_percent_input(percent);
    }

    if let Some(markup) = &request.markup {
        quote.set_markup_input(markup);
    }
    if let Some(quantity) = &request.quantity {
        quote.set_quantity_input(quantity);
    }

    let response = quote_response(services, &quote)?;
    Ok((quote, response))
}

fn quote_response(services: &AppServices, quote: &Quote) -> DomainResult<QuoteResponse> {
    let version_id = quote.version_id().ok_or(DomainError::NotFound)?;
    let version = services.catalog.version(version_id)?;
    let breakdown = quote.totals();

    Ok(QuoteResponse {
        version_id,
        version_name: version.name,
        exemption_tiers: version.exemption_tiers,
        discount_percent: quote.discount_percent(),
        breakdown,
        display: QuoteDisplay::from_breakdown(&breakdown),
    })
}
