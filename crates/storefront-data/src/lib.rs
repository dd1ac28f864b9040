//! Headless content backend client for the storefront.
//!
//! This crate provides:
//! - `Backend` - the read/aggregate contract the storefront core consumes
//! - `RecordQuery` / `FilterExpression` - declarative record queries
//! - `HttpBackend` - a Directus-style REST implementation over `reqwest`
//! - `AssetResolver` - file id to absolute asset URL
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::{Backend, FilterExpression, HttpBackend, RecordQuery, TimeoutConfig};
//!
//! let backend = HttpBackend::new("https://cms.example.com", &TimeoutConfig::default())?;
//!
//! let query = RecordQuery::new()
//!     .filter(FilterExpression::contains("name", "lamp"))
//!     .limit(12)
//!     .fields(["id", "name", "slug"]);
//!
//! let records = backend.query_records("products", &query).await?;
//! let total = backend.aggregate_count("products", &query.filter).await?;
//! ```

mod asset;
mod backend;
mod error;
mod filter;
mod http;
mod query;
mod timeout;

pub use asset::AssetResolver;
pub use backend::Backend;
pub use error::FetchError;
pub use filter::{Condition, FilterExpression};
pub use http::HttpBackend;
pub use query::RecordQuery;
pub use timeout::TimeoutConfig;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{AssetResolver, Backend, FetchError, FilterExpression, RecordQuery};
}
