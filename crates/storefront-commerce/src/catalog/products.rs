//! Product queries against the backend.

use std::sync::Arc;

use serde_json::Value;
use storefront_data::{AssetResolver, Backend, FilterExpression, RecordQuery};
use tracing::{debug, warn};

use crate::catalog::{ProductMapper, ProductView, RawProduct};
use crate::error::StoreError;
use crate::ids::CategoryId;
use crate::search::{build_filter, FilterOptions, PageResult};
use crate::settings::CatalogSettings;

/// Backend collection holding products.
pub const PRODUCT_COLLECTION: &str = "products";

/// Fields requested for every product record.
pub const PRODUCT_FIELDS: [&str; 16] = [
    "id",
    "name",
    "slug",
    "short_description",
    "description",
    "image",
    "category.id",
    "category.name",
    "category.slug",
    "categories.categories_id.id",
    "categories.categories_id.name",
    "categories.categories_id.slug",
    "tags.tags_id.name",
    "tags.tags_id.color",
    "variants.*",
    "gallery.directus_files_id",
];

/// A paged product query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Page number (1-indexed).
    pub page: u32,
    /// Products per page.
    pub limit: u32,
    /// Filter predicate.
    pub filter: FilterExpression,
    /// Sort key; a leading `-` sorts descending.
    pub sort: String,
}

impl ProductQuery {
    /// Create an unfiltered query for a page.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            filter: FilterExpression::All,
            sort: CatalogSettings::default().sort,
        }
    }

    /// Set the filter.
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = filter;
        self
    }

    /// Set the sort key.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Record offset of the first product on the page.
    ///
    /// Page and limit are clamped to at least 1, as the request is.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit.max(1))
    }
}

/// Reads products from the backend and maps them to view models.
///
/// Every product-returning operation hands back mapped `ProductView`s.
#[derive(Clone)]
pub struct ProductService {
    backend: Arc<dyn Backend>,
    mapper: ProductMapper,
    settings: CatalogSettings,
}

impl ProductService {
    /// Create a product service.
    pub fn new(backend: Arc<dyn Backend>, assets: AssetResolver, settings: CatalogSettings) -> Self {
        Self {
            backend,
            mapper: ProductMapper::new(assets),
            settings,
        }
    }

    /// Get the catalog settings.
    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Get the mapper.
    pub fn mapper(&self) -> &ProductMapper {
        &self.mapper
    }

    /// Fetch one page of products together with the total match count.
    ///
    /// The record and count queries run concurrently; both must succeed.
    pub async fn get_products(&self, query: ProductQuery) -> Result<PageResult<ProductView>, StoreError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let records_query = RecordQuery::new()
            .filter(query.filter.clone())
            .limit(i64::from(limit))
            .offset(query.offset())
            .sort(query.sort.clone())
            .fields(PRODUCT_FIELDS);

        debug!(page, limit, sort = %query.sort, "fetching products");
        let (records, total) = futures::try_join!(
            self.backend.query_records(PRODUCT_COLLECTION, &records_query),
            self.backend.aggregate_count(PRODUCT_COLLECTION, &query.filter),
        )?;

        let items = self.mapper.map_many(&decode(records));
        Ok(PageResult::new(items, total, page, limit))
    }

    /// Fetch a page matching user-facing filter options.
    pub async fn get_filtered(
        &self,
        page: u32,
        limit: u32,
        options: &FilterOptions,
    ) -> Result<PageResult<ProductView>, StoreError> {
        let query = ProductQuery::new(page, limit)
            .filter(build_filter(options))
            .sort(self.settings.sort.clone());
        self.get_products(query).await
    }

    /// Fetch a page of products in a category.
    pub async fn get_by_category(
        &self,
        category_id: &CategoryId,
        page: u32,
        limit: u32,
    ) -> Result<PageResult<ProductView>, StoreError> {
        let options = FilterOptions::default().with_categories(vec![category_id.clone()]);
        self.get_filtered(page, limit, &options).await
    }

    /// Fetch a page of products matching a keyword.
    pub async fn search(
        &self,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<PageResult<ProductView>, StoreError> {
        let options = FilterOptions::default().with_keyword(keyword);
        self.get_filtered(page, limit, &options).await
    }

    /// Fetch products carrying the featured tag. Not paginated.
    pub async fn get_featured(&self, limit: u32) -> Result<Vec<ProductView>, StoreError> {
        let query = RecordQuery::new()
            .filter(FilterExpression::eq(
                "tags.tags_id.name",
                self.settings.featured_tag.clone(),
            ))
            .limit(i64::from(limit))
            .fields(PRODUCT_FIELDS);

        let records = self.backend.query_records(PRODUCT_COLLECTION, &query).await?;
        Ok(self.mapper.map_many(&decode(records)))
    }

    /// Fetch a single product by slug. No match is `Ok(None)`.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ProductView>, StoreError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }

        let query = RecordQuery::new()
            .filter(FilterExpression::eq("slug", slug))
            .limit(1)
            .fields(PRODUCT_FIELDS);

        let records = self.backend.query_records(PRODUCT_COLLECTION, &query).await?;
        let product = decode(records).first().map(|raw| self.mapper.map_one(raw));
        if product.is_none() {
            debug!(slug, "product not found");
        }
        Ok(product)
    }
}

/// Decode raw records, skipping any that lack the shape of a product.
fn decode(records: Vec<Value>) -> Vec<RawProduct> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<RawProduct>(record) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(error = %e, "skipping malformed product record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockBackend};
    use serde_json::json;

    fn service() -> (Arc<MockBackend>, ProductService) {
        let backend = Arc::new(
            MockBackend::new().with_records(PRODUCT_COLLECTION, fixtures::product_records(25)),
        );
        let service = ProductService::new(
            backend.clone(),
            AssetResolver::new("https://cms.example.com"),
            CatalogSettings::default(),
        );
        (backend, service)
    }

    #[test]
    fn test_query_offset() {
        assert_eq!(ProductQuery::new(1, 12).offset(), 0);
        assert_eq!(ProductQuery::new(3, 12).offset(), 24);
        assert_eq!(ProductQuery::new(0, 12).offset(), 0);
        assert_eq!(ProductQuery::new(3, 0).offset(), 2);
    }

    #[tokio::test]
    async fn test_zero_limit_pages_one_product_at_a_time() {
        let (backend, service) = service();

        let page = service.get_products(ProductQuery::new(3, 0)).await.unwrap();
        let query = backend.last_query().unwrap();
        assert_eq!(query.offset, Some(2));
        assert_eq!(query.limit, Some(1));
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 25);
        assert_eq!(page.items[0].id, crate::ids::ProductId::new("3"));
    }

    #[tokio::test]
    async fn test_get_products_pages() {
        let (backend, service) = service();

        let page = service.get_products(ProductQuery::new(3, 12)).await.unwrap();
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(backend.query_calls(), 1);
        assert_eq!(backend.count_calls(), 1);

        let query = backend.last_query().unwrap();
        assert_eq!(query.offset, Some(24));
        assert_eq!(query.limit, Some(12));
        assert_eq!(query.sort, vec!["-date_created".to_string()]);
    }

    #[tokio::test]
    async fn test_items_are_mapped() {
        let (_backend, service) = service();
        let page = service.get_products(ProductQuery::new(1, 12)).await.unwrap();

        let first = &page.items[0];
        assert_eq!(first.name, "Product 1");
        assert_eq!(first.price, 1.0);
        assert_eq!(
            first.image.as_deref(),
            Some("https://cms.example.com/assets/file-1")
        );
    }

    #[tokio::test]
    async fn test_failure_is_error_not_empty() {
        let (backend, service) = service();
        backend.set_failing(true);

        let err = service.get_products(ProductQuery::new(1, 12)).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_search_filters_by_keyword() {
        let (backend, service) = service();

        let page = service.search("Product 2", 1, 12).await.unwrap();
        // "Product 2" and "Product 20".."Product 25"
        assert_eq!(page.total_count, 7);

        let query = backend.last_query().unwrap();
        assert_eq!(
            query.filter.to_value(),
            json!({"_or": [
                {"name": {"_contains": "Product 2"}},
                {"short_description": {"_contains": "Product 2"}},
                {"description": {"_contains": "Product 2"}}
            ]})
        );
    }

    #[tokio::test]
    async fn test_get_by_category_includes_secondary_membership() {
        let (_backend, service) = service();
        let page = service
            .get_by_category(&CategoryId::new("6"), 1, 12)
            .await
            .unwrap();
        // Every fifth product lists category 6 as a secondary category.
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn test_get_featured() {
        let (backend, service) = service();
        let featured = service.get_featured(4).await.unwrap();

        assert_eq!(featured.len(), 4);
        assert!(featured.iter().all(|p| p.badge.as_deref() == Some("精選")));
        assert_eq!(backend.last_query().unwrap().limit, Some(4));
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let (backend, service) = service();

        let found = service.get_by_slug("product-7").await.unwrap();
        assert_eq!(found.map(|p| p.name), Some("Product 7".to_string()));

        assert!(service.get_by_slug("missing").await.unwrap().is_none());

        let calls = backend.query_calls();
        assert!(service.get_by_slug("  ").await.unwrap().is_none());
        assert_eq!(backend.query_calls(), calls);
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped() {
        let backend = Arc::new(MockBackend::new().with_records(
            PRODUCT_COLLECTION,
            vec![json!({"name": "no id"}), json!({"id": 1, "name": "ok"})],
        ));
        let service = ProductService::new(
            backend,
            AssetResolver::new("https://cms.example.com"),
            CatalogSettings::default(),
        );

        let page = service.get_products(ProductQuery::new(1, 12)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "ok");
    }
}
