//! Catalog settings.

use serde::{Deserialize, Serialize};

/// Tunables for the catalog services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Products per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Tag name marking featured products.
    #[serde(default = "default_featured_tag")]
    pub featured_tag: String,

    /// Number of featured products to show.
    #[serde(default = "default_featured_limit")]
    pub featured_limit: u32,

    /// Sort key for product listings; a leading `-` sorts descending.
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_per_page() -> u32 {
    12
}

fn default_featured_tag() -> String {
    "精選".to_string()
}

fn default_featured_limit() -> u32 {
    4
}

fn default_sort() -> String {
    "-date_created".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            featured_tag: default_featured_tag(),
            featured_limit: default_featured_limit(),
            sort: default_sort(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: CatalogSettings = serde_json::from_str(r#"{"per_page": 24}"#).unwrap();
        assert_eq!(settings.per_page, 24);
        assert_eq!(settings.featured_tag, "精選");
        assert_eq!(settings.sort, "-date_created");
    }
}
