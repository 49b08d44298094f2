//! Request/response DTOs and JSON mapping helpers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dealerdesk_auth::{Role, RoleOverrides};
use dealerdesk_catalog::records::ExemptionTiers;
use dealerdesk_core::{BrandId, ColorId, ModelId, Money, OptionalId, PaintTypeId, VersionId};
use dealerdesk_pricing::PriceBreakdown;

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

/// Body of an override save: the full replacement map for one role, keyed
/// by rule id. Partial merges do not exist; the client assembles the whole
/// map before posting.
#[derive(Debug, Deserialize)]
pub struct SaveOverridesRequest {
    pub permissions: RoleOverrides,
}

#[derive(Debug, Serialize)]
pub struct RoleOverridesResponse {
    pub role: Role,
    /// `null` when the role runs entirely on matrix defaults.
    pub overrides: Option<RoleOverrides>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NavigationCheckQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct NavigationDecision {
    pub path: String,
    pub allowed: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configurator: selection data
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BrandOptions {
    pub id: BrandId,
    pub name: String,
    pub models: Vec<ModelOptions>,
}

#[derive(Debug, Serialize)]
pub struct ModelOptions {
    pub id: ModelId,
    pub name: String,
    pub versions: Vec<VersionSummary>,
}

#[derive(Debug, Serialize)]
pub struct VersionSummary {
    pub id: VersionId,
    pub name: String,
    pub base_public_price: Money,
}

#[derive(Debug, Serialize)]
pub struct ColorOption {
    pub color_id: ColorId,
    pub name: String,
    pub paint_type_id: PaintTypeId,
    pub paint_type: String,
    /// Per-version surcharge (version override applied when present).
    pub price: Money,
}

#[derive(Debug, Serialize)]
pub struct OptionalOption {
    pub optional_id: OptionalId,
    pub name: String,
    /// The version-specific price, never the catalog-generic one.
    pub price: Money,
}

#[derive(Debug, Serialize)]
pub struct VersionOptionsResponse {
    pub version: VersionSummary,
    pub exemption_tiers: ExemptionTiers,
    pub colors: Vec<ColorOption>,
    pub optionals: Vec<OptionalOption>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configurator: quoting
// ─────────────────────────────────────────────────────────────────────────────

/// Live configurator input.
///
/// Numeric fields arrive as raw form text and parse leniently (unparsable
/// discount/markup → 0, quantity → 1) so the preview always renders.
/// `discount_amount` wins over `discount_percent` when both are present:
/// the client sends the field the user edited last.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub version_id: VersionId,
    pub color_id: Option<ColorId>,
    #[serde(default)]
    pub optional_ids: Vec<OptionalId>,
    pub discount_percent: Option<String>,
    pub discount_amount: Option<String>,
    pub markup: Option<String>,
    pub quantity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub version_id: VersionId,
    pub version_name: String,
    /// Display values straight from the stored version record.
    pub exemption_tiers: ExemptionTiers,
    pub discount_percent: Decimal,
    pub breakdown: PriceBreakdown,
    pub display: QuoteDisplay,
}

/// Pre-formatted BRL strings for the price summary panel.
#[derive(Debug, Serialize)]
pub struct QuoteDisplay {
    pub subtotal: String,
    pub with_discount: String,
    pub final_price: String,
}

impl QuoteDisplay {
    pub fn from_breakdown(breakdown: &PriceBreakdown) -> Self {
        Self {
            subtotal: breakdown.subtotal.format_brl(),
            with_discount: breakdown.with_discount.format_brl(),
            final_price: breakdown.final_price.format_brl(),
        }
    }
}
