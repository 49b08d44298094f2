//! Read contract over the catalog, plus an in-memory implementation for
//! tests and development.

use std::collections::HashMap;

use dealerdesk_core::{
    BrandId, ColorId, DomainError, DomainResult, ModelId, Money, OptionalId, PaintTypeId,
    VersionId,
};

use crate::records::{Brand, Color, Model, Optional, PaintType, Version, VersionColor, VersionOptional};

/// Read-only catalog access for the configurator.
///
/// Unresolved ids surface as [`DomainError::NotFound`] and propagate to the
/// caller unchanged; the engines never retry or recover them.
pub trait CatalogProvider: Send + Sync {
    /// Selection data for the configurator's brand → model → version
    /// cascade.
    fn brands(&self) -> DomainResult<Vec<Brand>>;

    fn models_of(&self, brand_id: BrandId) -> DomainResult<Vec<Model>>;

    fn versions_of(&self, model_id: ModelId) -> DomainResult<Vec<Version>>;

    fn version(&self, id: VersionId) -> DomainResult<Version>;

    fn color(&self, id: ColorId) -> DomainResult<Color>;

    fn colors(&self) -> DomainResult<Vec<Color>>;

    fn paint_type(&self, id: PaintTypeId) -> DomainResult<PaintType>;

    fn optional(&self, id: OptionalId) -> DomainResult<Optional>;

    /// The surcharge a color adds on a given version: the per-version
    /// override when one exists, the color's catalog surcharge otherwise.
    fn color_price(&self, version_id: VersionId, color_id: ColorId) -> DomainResult<Money>;

    /// The version-specific price of an optional. `NotFound` when the
    /// optional is not offered on the version.
    fn optional_price(
        &self,
        version_id: VersionId,
        optional_id: OptionalId,
    ) -> DomainResult<Money>;

    /// Optionals offered on a version, with their per-version prices.
    fn version_optionals(&self, version_id: VersionId) -> DomainResult<Vec<VersionOptional>>;
}

/// HashMap-backed catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    brands: HashMap<BrandId, Brand>,
    models: HashMap<ModelId, Model>,
    paint_types: HashMap<PaintTypeId, PaintType>,
    versions: HashMap<VersionId, Version>,
    colors: HashMap<ColorId, Color>,
    optionals: HashMap<OptionalId, Optional>,
    version_colors: HashMap<(VersionId, ColorId), VersionColor>,
    version_optionals: HashMap<(VersionId, OptionalId), VersionOptional>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_brand(&mut self, brand: Brand) -> &mut Self {
        self.brands.insert(brand.id, brand);
        self
    }

    pub fn insert_model(&mut self, model: Model) -> &mut Self {
        self.models.insert(model.id, model);
        self
    }

    pub fn insert_paint_type(&mut self, paint_type: PaintType) -> &mut Self {
        self.paint_types.insert(paint_type.id, paint_type);
        self
    }

    pub fn insert_version(&mut self, version: Version) -> &mut Self {
        self.versions.insert(version.id, version);
        self
    }

    pub fn insert_color(&mut self, color: Color) -> &mut Self {
        self.colors.insert(color.id, color);
        self
    }

    pub fn insert_optional(&mut self, optional: Optional) -> &mut Self {
        self.optionals.insert(optional.id, optional);
        self
    }

    pub fn insert_version_color(&mut self, association: VersionColor) -> &mut Self {
        self.version_colors
            .insert((association.version_id, association.color_id), association);
        self
    }

    pub fn insert_version_optional(&mut self, association: VersionOptional) -> &mut Self {
        self.version_optionals.insert(
            (association.version_id, association.optional_id),
            association,
        );
        self
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn brands(&self) -> DomainResult<Vec<Brand>> {
        let mut brands: Vec<_> = self.brands.values().cloned().collect();
        brands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brands)
    }

    fn models_of(&self, brand_id: BrandId) -> DomainResult<Vec<Model>> {
        self.brands.get(&brand_id).ok_or(DomainError::NotFound)?;

        let mut models: Vec<_> = self
            .models
            .values()
            .filter(|model| model.brand_id == brand_id)
            .cloned()
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }

    fn versions_of(&self, model_id: ModelId) -> DomainResult<Vec<Version>> {
        self.models.get(&model_id).ok_or(DomainError::NotFound)?;

        let mut versions: Vec<_> = self
            .versions
            .values()
            .filter(|version| version.model_id == model_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(versions)
    }

    fn version(&self, id: VersionId) -> DomainResult<Version> {
        self.versions.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn color(&self, id: ColorId) -> DomainResult<Color> {
        self.colors.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn colors(&self) -> DomainResult<Vec<Color>> {
        let mut colors: Vec<_> = self.colors.values().cloned().collect();
        colors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(colors)
    }

    fn paint_type(&self, id: PaintTypeId) -> DomainResult<PaintType> {
        self.paint_types
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn optional(&self, id: OptionalId) -> DomainResult<Optional> {
        self.optionals
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn color_price(&self, version_id: VersionId, color_id: ColorId) -> DomainResult<Money> {
        let color = self.color(color_id)?;

        let override_price = self
            .version_colors
            .get(&(version_id, color_id))
            .and_then(|association| association.additional_price);

        Ok(override_price.unwrap_or(color.additional_price))
    }

    fn optional_price(
        &self,
        version_id: VersionId,
        optional_id: OptionalId,
    ) -> DomainResult<Money> {
        self.version_optionals
            .get(&(version_id, optional_id))
            .map(|association| association.price)
            .ok_or(DomainError::NotFound)
    }

    fn version_optionals(&self, version_id: VersionId) -> DomainResult<Vec<VersionOptional>> {
        // The version must exist even when it has no optionals.
        self.version(version_id)?;

        Ok(self
            .version_optionals
            .values()
            .filter(|association| association.version_id == version_id)
            .cloned()
            .collect())
    }
}
