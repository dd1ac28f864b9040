//! Product filter building.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};
use storefront_data::FilterExpression;

/// Text fields searched by a keyword.
pub const KEYWORD_FIELDS: [&str; 3] = ["name", "short_description", "description"];

/// Paths linking a product to a category: the primary category and the
/// many-to-many secondary categories.
pub const CATEGORY_PATHS: [&str; 2] = ["category", "categories.categories_id"];

/// User-facing filter options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Match products in any of these categories.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    /// Match products whose text fields contain this keyword, as given.
    #[serde(default)]
    pub keyword: String,
}

impl FilterOptions {
    /// Restrict to a set of categories.
    pub fn with_categories(mut self, ids: Vec<CategoryId>) -> Self {
        self.category_ids = ids;
        self
    }

    /// Restrict to a keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Check if no option constrains the result.
    pub fn is_empty(&self) -> bool {
        build_filter(self).is_all()
    }
}

/// Build the backend filter for a set of options.
///
/// Blank category ids and a blank keyword are ignored rather than
/// rejected, so malformed input degrades to "no constraint".
pub fn build_filter(options: &FilterOptions) -> FilterExpression {
    FilterExpression::and([
        category_clause(&options.category_ids),
        keyword_clause(&options.keyword),
    ])
}

fn category_clause(ids: &[CategoryId]) -> FilterExpression {
    let ids: Vec<_> = ids
        .iter()
        .filter(|id| !id.as_str().trim().is_empty())
        .map(CategoryId::to_value)
        .collect();
    if ids.is_empty() {
        return FilterExpression::All;
    }

    FilterExpression::or(
        CATEGORY_PATHS
            .iter()
            .map(|path| FilterExpression::is_in(path, ids.clone())),
    )
}

fn keyword_clause(keyword: &str) -> FilterExpression {
    if keyword.trim().is_empty() {
        return FilterExpression::All;
    }

    FilterExpression::or(
        KEYWORD_FIELDS
            .iter()
            .map(|field| FilterExpression::contains(field, keyword)),
    )
}
