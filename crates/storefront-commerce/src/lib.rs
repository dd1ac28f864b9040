//! Catalog query, mapping and pagination layer for the storefront.
//!
//! This crate sits between the UI and a headless content backend:
//!
//! - **Catalog**: categories, the category tree service, products and the
//!   raw-record to view-model mapper
//! - **Search**: the filter builder, page results, and the product list
//!   controller that owns pagination/filter state
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_commerce::prelude::*;
//! use storefront_data::{AssetResolver, HttpBackend, TimeoutConfig};
//!
//! let backend = Arc::new(HttpBackend::new("https://cms.example.com", &TimeoutConfig::default())?);
//! let categories = Arc::new(CategoryService::new(backend.clone()));
//! let products = ProductService::new(
//!     backend,
//!     AssetResolver::new("https://cms.example.com"),
//!     CatalogSettings::default(),
//! );
//!
//! let controller = ProductListController::new(products, categories);
//! controller.set_filters(ProductFilters::default().with_category("lighting")).await;
//!
//! let page = controller.snapshot();
//! println!("page {} of {}", page.current_page, page.total_pages);
//! ```

pub mod error;
pub mod ids;
pub mod settings;

pub mod catalog;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use error::StoreError;
pub use ids::*;
pub use settings::CatalogSettings;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::ids::*;
    pub use crate::settings::CatalogSettings;

    // Catalog
    pub use crate::catalog::{
        Category, CategoryIndex, CategoryNode, CategoryRef, CategoryService, ProductMapper,
        ProductQuery, ProductService, ProductView, RawProduct, VariantView,
    };

    // Search
    pub use crate::search::{
        build_filter, FilterOptions, ListSnapshot, LoadStatus, PageResult, Pagination,
        ProductFilters, ProductListController,
    };
}
