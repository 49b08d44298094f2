//! Service wiring: the compiled matrix, the override store, and the catalog
//! the handlers consume.

use std::sync::Arc;

use dealerdesk_auth::{AccessEngine, OverrideStore, default_matrix};
use dealerdesk_catalog::{CatalogProvider, InMemoryCatalog};
use dealerdesk_catalog::records::{
    Brand, Color, ExemptionTiers, Model, Optional, PaintType, Version, VersionColor,
    VersionOptional,
};
use dealerdesk_core::{BrandId, ColorId, ModelId, Money, OptionalId, PaintTypeId, VersionId};
use dealerdesk_infra::{InMemoryOverrideStore, PgOverrideStore};

/// Shared per-process services.
pub struct AppServices {
    pub engine: AccessEngine<Arc<dyn OverrideStore>>,
    pub store: Arc<dyn OverrideStore>,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppServices {
    pub fn new(store: Arc<dyn OverrideStore>, catalog: Arc<dyn CatalogProvider>) -> anyhow::Result<Self> {
        // The matrix is validated here, once, at startup. A malformed rule
        // table aborts boot instead of surfacing per request.
        let matrix = Arc::new(default_matrix()?);
        Ok(Self {
            engine: AccessEngine::new(matrix, store.clone()),
            store,
            catalog,
        })
    }
}

/// Environment-driven wiring: Postgres when `DATABASE_URL` is set, the
/// in-memory store otherwise; the catalog is the seeded demo set until the
/// back-office CRUD layer provides a real one.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let store: Arc<dyn OverrideStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url).await?;
            let store = PgOverrideStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; permission overrides will not survive restart");
            Arc::new(InMemoryOverrideStore::new())
        }
    };

    AppServices::new(store, Arc::new(demo_catalog()))
}

/// A small seeded catalog for development runs.
pub fn demo_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();

    let brand = BrandId::new();
    let model = ModelId::new();

    let solid = PaintTypeId::new();
    let metallic = PaintTypeId::new();

    let white = ColorId::new();
    let silver = ColorId::new();

    let sunroof = OptionalId::new();
    let sound = OptionalId::new();

    let comfortline = VersionId::new();
    let highline = VersionId::new();

    catalog.insert_brand(Brand {
        id: brand,
        name: "Volkswagen".to_string(),
    });
    catalog.insert_model(Model {
        id: model,
        brand_id: brand,
        name: "Virtus".to_string(),
    });
    catalog.insert_paint_type(PaintType {
        id: solid,
        name: "Sólida".to_string(),
    });
    catalog.insert_paint_type(PaintType {
        id: metallic,
        name: "Metálica".to_string(),
    });

    catalog.insert_version(Version {
        id: comfortline,
        model_id: model,
        name: "Comfortline TSI 116CV".to_string(),
        base_public_price: Money::from_major(105_990),
        exemption_tiers: ExemptionTiers::suggested_from_list(Money::from_major(105_990)),
    });
    catalog.insert_version(Version {
        id: highline,
        model_id: model,
        name: "Highline TSI 150CV".to_string(),
        base_public_price: Money::from_major(124_490),
        exemption_tiers: ExemptionTiers::suggested_from_list(Money::from_major(124_490)),
    });

    catalog.insert_color(Color {
        id: white,
        paint_type_id: solid,
        name: "Branco Cristal".to_string(),
        additional_price: Money::ZERO,
    });
    catalog.insert_color(Color {
        id: silver,
        paint_type_id: metallic,
        name: "Prata Sirius".to_string(),
        additional_price: Money::from_major(1_650),
    });
    catalog.insert_version_color(VersionColor {
        version_id: highline,
        color_id: silver,
        additional_price: Some(Money::from_major(1_950)),
        image_url: None,
    });

    catalog.insert_optional(Optional {
        id: sunroof,
        name: "Teto solar".to_string(),
        price: Money::from_major(3_000),
    });
    catalog.insert_optional(Optional {
        id: sound,
        name: "Som premium".to_string(),
        price: Money::from_major(1_200),
    });
    catalog.insert_version_optional(VersionOptional {
        version_id: comfortline,
        optional_id: sound,
        price: Money::from_major(800),
    });
    catalog.insert_version_optional(VersionOptional {
        version_id: highline,
        optional_id: sunroof,
        price: Money::from_major(2_700),
    });
    catalog.insert_version_optional(VersionOptional {
        version_id: highline,
        optional_id: sound,
        price: Money::from_major(1_200),
    });

    catalog
}
