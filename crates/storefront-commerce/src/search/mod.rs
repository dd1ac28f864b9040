//! Search module.
//!
//! Contains the filter builder, paged results, and the product list
//! controller.

mod controller;
mod filter;
mod results;

pub use controller::{ListSnapshot, LoadStatus, ProductFilters, ProductListController};
pub use filter::{build_filter, FilterOptions, CATEGORY_PATHS, KEYWORD_FIELDS};
pub use results::{PageResult, Pagination};
