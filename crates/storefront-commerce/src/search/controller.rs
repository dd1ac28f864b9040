//! Product list controller: pagination and filter state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::catalog::{CategoryService, ProductService, ProductView};
use crate::error::StoreError;
use crate::search::{FilterOptions, PageResult, Pagination};

/// Lifecycle of the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Loaded,
    /// The latest fetch failed; previous items are kept.
    Errored,
}

/// Filters as the shopper sets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Category slug; blank means every category.
    #[serde(default)]
    pub category_slug: String,
    /// Search keyword; blank means no keyword.
    #[serde(default)]
    pub keyword: String,
}

impl ProductFilters {
    /// Restrict to a category (and its subcategories).
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = slug.into();
        self
    }

    /// Restrict to a keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }
}

/// A consistent view of the list state.
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot {
    pub status: LoadStatus,
    pub items: Vec<ProductView>,
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub filters: ProductFilters,
    /// User-facing message for the latest failure.
    pub error: Option<String>,
}

impl ListSnapshot {
    fn new(per_page: u32) -> Self {
        Self {
            status: LoadStatus::Idle,
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: 1,
            per_page,
            filters: ProductFilters::default(),
            error: None,
        }
    }

    /// Whether there's a next page.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Pagination info for the current page.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.current_page, self.per_page, self.total_items)
    }
}

/// Owns the product list state and drives fetches for it.
///
/// Each fetch takes a ticket from a monotonically increasing counter. Only
/// the holder of the newest ticket may write its outcome, so a slow
/// response to an older fetch never overwrites a newer one. On success the
/// whole snapshot is replaced in one assignment.
pub struct ProductListController {
    products: ProductService,
    categories: Arc<CategoryService>,
    per_page: u32,
    state: Mutex<ListSnapshot>,
    latest: AtomicU64,
}

impl ProductListController {
    /// Create a controller; the page size comes from the product service's
    /// settings.
    pub fn new(products: ProductService, categories: Arc<CategoryService>) -> Self {
        let per_page = products.settings().per_page.max(1);
        Self {
            products,
            categories,
            per_page,
            state: Mutex::new(ListSnapshot::new(per_page)),
            latest: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ListSnapshot {
        self.lock().clone()
    }

    /// Products per page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Fetch a page with the given filters.
    ///
    /// Failures are recorded in the snapshot, never returned: the error
    /// message is set and the previous items stay visible.
    pub async fn fetch(&self, page: u32, filters: ProductFilters) {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let page = page.max(1);
        let result = self.load_page(page, &filters).await;

        let mut state = self.lock();
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(ticket, page, "discarding stale product page");
            return;
        }

        match result {
            Ok(result) => {
                *state = ListSnapshot {
                    status: LoadStatus::Loaded,
                    items: result.items,
                    total_items: result.total_count,
                    total_pages: result.total_pages,
                    current_page: result.current_page,
                    per_page: self.per_page,
                    filters,
                    error: None,
                };
            }
            Err(err) => {
                error!(error = %err, page, "failed to load products");
                state.status = LoadStatus::Errored;
                state.error = Some(user_message(&err).to_string());
            }
        }
    }

    /// Go to the next page, if there is one.
    pub async fn next(&self) {
        let state = self.snapshot();
        if state.has_next_page() {
            self.fetch(state.current_page + 1, state.filters).await;
        }
    }

    /// Go to the previous page, if there is one.
    pub async fn prev(&self) {
        let state = self.snapshot();
        if state.has_prev_page() {
            self.fetch(state.current_page - 1, state.filters).await;
        }
    }

    /// Go to a page within `[1, total_pages]`; anything else is ignored.
    pub async fn go_to(&self, page: u32) {
        let state = self.snapshot();
        if page >= 1 && page <= state.total_pages {
            self.fetch(page, state.filters).await;
        }
    }

    /// Apply new filters, starting again from page 1.
    pub async fn set_filters(&self, filters: ProductFilters) {
        self.fetch(1, filters).await;
    }

    async fn load_page(
        &self,
        page: u32,
        filters: &ProductFilters,
    ) -> Result<PageResult<ProductView>, StoreError> {
        let options = self.resolve_filters(filters).await?;
        self.products.get_filtered(page, self.per_page, &options).await
    }

    /// Turn a category slug into its descendant closure so a category
    /// page also lists products filed under its subcategories.
    async fn resolve_filters(&self, filters: &ProductFilters) -> Result<FilterOptions, StoreError> {
        let options = FilterOptions::default().with_keyword(filters.keyword.clone());

        let slug = filters.category_slug.trim();
        if slug.is_empty() {
            return Ok(options);
        }

        let index = self.categories.load().await?;
        match index.id_by_slug(slug) {
            Some(id) => Ok(options.with_categories(index.descendant_ids(&id))),
            None => {
                warn!(slug, "unknown category slug, ignoring category filter");
                Ok(options)
            }
        }
    }
}

fn user_message(err: &StoreError) -> &'static str {
    match err {
        StoreError::Load(_) => "Failed to load categories",
        _ => "Failed to load products",
    }
}
