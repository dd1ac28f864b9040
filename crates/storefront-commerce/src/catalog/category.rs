//! Category types for product organization.

use crate::ids::{CategoryId, RawKey};
use serde::{Deserialize, Deserializer, Serialize};

/// A product category in the catalog hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Parent category ID (None for root categories).
    #[serde(rename = "parent", default, deserialize_with = "relation_id")]
    pub parent_id: Option<CategoryId>,
    /// Category name.
    #[serde(default)]
    pub name: String,
    /// URL-friendly slug.
    #[serde(default)]
    pub slug: String,
    /// Sort order position within parent.
    #[serde(default)]
    pub sort: Option<i64>,
}

impl Category {
    /// Create a new root category.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            slug: slug.into(),
            sort: None,
        }
    }

    /// Set the parent category.
    pub fn with_parent(mut self, parent: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Set the sort position.
    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Sort position, with a missing value treated as 0.
    pub fn position(&self) -> i64 {
        self.sort.unwrap_or(0)
    }
}

/// A category with its children attached, as rendered in navigation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Number of categories in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::subtree_size).sum::<usize>()
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A many-to-one link arrives as null, a bare key, or an expanded record.
fn relation_id<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Relation {
        Key(RawKey),
        Record { id: Option<RawKey> },
    }

    Ok(Option::<Relation>::deserialize(deserializer)?.and_then(|relation| match relation {
        Relation::Key(key) => Some(CategoryId::new(key.into_string())),
        Relation::Record { id } => id.map(|key| CategoryId::new(key.into_string())),
    }))
}
