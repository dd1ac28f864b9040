//! Raw product record to view model mapping.

use storefront_data::AssetResolver;

use crate::catalog::{
    CategoryRef, FileObject, Link, ProductView, RawProduct, RawVariant, VariantView,
};

/// Maps backend product records to view models.
///
/// Mapping never fails: missing associations become `None` or empty
/// lists, and the input record is left untouched.
#[derive(Debug, Clone)]
pub struct ProductMapper {
    assets: AssetResolver,
}

impl ProductMapper {
    /// Create a mapper resolving file ids through `assets`.
    pub fn new(assets: AssetResolver) -> Self {
        Self { assets }
    }

    /// Get the asset resolver.
    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    /// Map one record.
    pub fn map_one(&self, raw: &RawProduct) -> ProductView {
        let categories: Vec<CategoryRef> = raw
            .categories
            .iter()
            .filter_map(|junction| junction.categories_id.clone())
            .map(Link::into_ref)
            .collect();

        let category = raw
            .category
            .clone()
            .map(Link::into_ref)
            .or_else(|| categories.first().cloned());

        // Only the first tag row counts, even if its tag did not expand.
        let badge_tag = raw
            .tags
            .first()
            .and_then(|junction| junction.tags_id.as_ref())
            .map(|link| match link {
                Link::Expanded(tag) => (tag.name.clone(), tag.color.clone()),
                Link::Key(_) => (None, None),
            });
        let (badge, badge_color) = badge_tag.unwrap_or((None, None));

        ProductView {
            id: raw.id.clone(),
            name: raw.name.clone().unwrap_or_default(),
            slug: raw.slug.clone().unwrap_or_default(),
            short_description: raw.short_description.clone(),
            description: raw.description.clone(),
            price: display_price(&raw.variants),
            image: self.resolve(raw.image.as_ref()),
            gallery: raw
                .gallery
                .iter()
                .filter_map(|junction| self.resolve(junction.directus_files_id.as_ref()))
                .collect(),
            category,
            categories,
            badge,
            badge_color,
            variants: raw.variants.iter().map(|v| self.map_variant(v)).collect(),
        }
    }

    /// Map records element-wise, preserving order.
    pub fn map_many(&self, raws: &[RawProduct]) -> Vec<ProductView> {
        raws.iter().map(|raw| self.map_one(raw)).collect()
    }

    fn map_variant(&self, variant: &RawVariant) -> VariantView {
        VariantView {
            id: variant.id.clone(),
            name: variant.name.clone(),
            sku: variant.sku.clone(),
            price: variant.price,
            stock: variant.stock.map(|stock| stock as i64),
            status: variant.status.clone(),
            image: self.resolve(variant.image.as_ref()),
        }
    }

    fn resolve(&self, file: Option<&Link<FileObject>>) -> Option<String> {
        let id = file.and_then(Link::file_id)?;
        self.assets.resolve(Some(id.as_str()))
    }
}

/// Lowest defined variant price, or 0 when no variant carries one.
pub fn display_price(variants: &[RawVariant]) -> f64 {
    variants
        .iter()
        .filter_map(|variant| variant.price)
        .fold(None, |lowest: Option<f64>, price| {
            Some(lowest.map_or(price, |lowest| lowest.min(price)))
        })
        .unwrap_or(0.0)
}
