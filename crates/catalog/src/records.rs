//! Catalog record shapes.
//!
//! All prices are opaque decimal inputs from the engines' point of view: a
//! version's exemption tiers are stored values, not formulas, and nothing
//! downstream ever recomputes them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dealerdesk_core::{BrandId, ColorId, ModelId, Money, OptionalId, PaintTypeId, VersionId};

/// Vehicle brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// Vehicle model, owned by a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub brand_id: BrandId,
    pub name: String,
}

/// Paint finish category (solid, metallic, pearlescent, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintType {
    pub id: PaintTypeId,
    pub name: String,
}

/// A color with its paint type and catalog-level surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub paint_type_id: PaintTypeId,
    pub name: String,
    pub additional_price: Money,
}

/// Optional equipment with its generic catalog price.
///
/// The price that actually enters a quote is the per-version association
/// price ([`VersionOptional`]), never this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optional {
    pub id: OptionalId,
    pub name: String,
    pub price: Money,
}

/// The four tax-exemption price points stored on a version.
///
/// These are independent stored inputs. The fixed-ratio derivation below is
/// a form-prefill convenience for registrars; an administrator can and does
/// save tiers that diverge from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionTiers {
    pub pcd_ipi_icms: Money,
    pub pcd_ipi: Money,
    pub taxi_ipi_icms: Money,
    pub taxi_ipi: Money,
}

impl ExemptionTiers {
    /// Prefill suggestion from a list price: 12%, 4%, 15% and 4% off,
    /// respectively. Never consulted by the pricing engine.
    pub fn suggested_from_list(list: Money) -> Self {
        Self {
            pcd_ipi_icms: list - list.percent_of(Decimal::from(12)),
            pcd_ipi: list - list.percent_of(Decimal::from(4)),
            taxi_ipi_icms: list - list.percent_of(Decimal::from(15)),
            taxi_ipi: list - list.percent_of(Decimal::from(4)),
        }
    }
}

/// A model version (trim), the unit that carries pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub model_id: ModelId,
    pub name: String,
    pub base_public_price: Money,
    pub exemption_tiers: ExemptionTiers,
}

/// Version ↔ color association: per-version surcharge and image overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionColor {
    pub version_id: VersionId,
    pub color_id: ColorId,
    /// Overrides the color's catalog surcharge for this version when set.
    pub additional_price: Option<Money>,
    pub image_url: Option<String>,
}

/// Version ↔ optional association carrying the version-specific price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOptional {
    pub version_id: VersionId,
    pub optional_id: OptionalId,
    pub price: Money,
}
