//! Product records as the backend returns them, and the flat view model
//! the storefront renders.

use crate::ids::{CategoryId, FileId, ProductId, RawKey, VariantId};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A related record that arrives either as its bare key or expanded into
/// an object, depending on the requested field projection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Link<T> {
    Expanded(T),
    Key(RawKey),
}

/// Category reference carried on a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<CategoryId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Link<CategoryRef> {
    /// Resolve to a category reference.
    pub fn into_ref(self) -> CategoryRef {
        match self {
            Link::Expanded(category) => category,
            Link::Key(key) => CategoryRef {
                id: Some(CategoryId::new(key.into_string())),
                ..Default::default()
            },
        }
    }
}

/// File object as returned by the files collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub id: Option<FileId>,
}

impl Link<FileObject> {
    /// The referenced file id, if any.
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            Link::Expanded(file) => file.id.clone(),
            Link::Key(key) => Some(FileId::new(key.clone().into_string())),
        }
    }
}

/// Tag attached to a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTag {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Many-to-many junction row to a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryJunction {
    #[serde(default)]
    pub categories_id: Option<Link<CategoryRef>>,
}

/// Many-to-many junction row to a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct TagJunction {
    #[serde(default)]
    pub tags_id: Option<Link<RawTag>>,
}

/// Many-to-many junction row to a gallery file.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryJunction {
    #[serde(default)]
    pub directus_files_id: Option<Link<FileObject>>,
}

/// A purchasable variant as stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    #[serde(default)]
    pub id: Option<VariantId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub stock: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image: Option<Link<FileObject>>,
}

/// A product record with its nested associations.
///
/// Every association is optional; absent or null associations decode to
/// `None` or an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<Link<FileObject>>,
    /// Primary category.
    #[serde(default)]
    pub category: Option<Link<CategoryRef>>,
    /// Secondary categories.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<CategoryJunction>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<TagJunction>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub variants: Vec<RawVariant>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gallery: Vec<GalleryJunction>,
}

impl RawProduct {
    /// Create a bare record with only an id.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            slug: None,
            short_description: None,
            description: None,
            image: None,
            category: None,
            categories: Vec::new(),
            tags: Vec::new(),
            variants: Vec::new(),
            gallery: Vec::new(),
        }
    }
}

/// A variant as shown to shoppers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariantView {
    pub id: Option<VariantId>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub status: Option<String>,
    pub image: Option<String>,
}

impl VariantView {
    /// Check if the variant has stock on hand.
    pub fn in_stock(&self) -> bool {
        self.stock.is_some_and(|stock| stock > 0)
    }
}

/// The flat product view model.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    /// Lowest defined variant price, or 0.
    pub price: f64,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub category: Option<CategoryRef>,
    pub categories: Vec<CategoryRef>,
    pub badge: Option<String>,
    #[serde(rename = "badgeColor")]
    pub badge_color: Option<String>,
    pub variants: Vec<VariantView>,
}

impl ProductView {
    /// Check if any variant has stock on hand.
    pub fn in_stock(&self) -> bool {
        self.variants.iter().any(VariantView::in_stock)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decimal columns come back as numbers or numeric strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                warn!(value = %s, "ignoring non-numeric value");
                None
            }
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_record() {
        let raw: RawProduct = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(raw.id, ProductId::new("1"));
        assert!(raw.variants.is_empty());
        assert!(raw.category.is_none());
    }

    #[test]
    fn test_decode_null_associations() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": 1,
            "image": null,
            "category": null,
            "categories": null,
            "tags": null,
            "variants": null,
            "gallery": null
        }))
        .unwrap();
        assert!(raw.image.is_none());
        assert!(raw.tags.is_empty());
        assert!(raw.gallery.is_empty());
    }

    #[test]
    fn test_decode_links() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "p-1",
            "image": "file-1",
            "category": 3,
            "categories": [{"categories_id": {"id": 4, "name": "Lamps", "slug": "lamps"}}],
            "gallery": [{"directus_files_id": {"id": "file-2"}}]
        }))
        .unwrap();

        assert_eq!(raw.image.unwrap().file_id(), Some(FileId::new("file-1")));
        assert_eq!(raw.category.unwrap().into_ref().id, Some(CategoryId::new("3")));

        let secondary = raw.categories[0].categories_id.clone().unwrap().into_ref();
        assert_eq!(secondary.slug.as_deref(), Some("lamps"));

        let file = raw.gallery[0].directus_files_id.as_ref().unwrap().file_id();
        assert_eq!(file, Some(FileId::new("file-2")));
    }

    #[test]
    fn test_decode_string_prices() {
        let variant: RawVariant =
            serde_json::from_value(json!({"price": "12.50", "stock": "3"})).unwrap();
        assert_eq!(variant.price, Some(12.5));
        assert_eq!(variant.stock, Some(3.0));

        let bad: RawVariant = serde_json::from_value(json!({"price": "n/a"})).unwrap();
        assert_eq!(bad.price, None);
    }
}
