//! Immutable lookup structure over a loaded category set.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use crate::catalog::{Category, CategoryNode};
use crate::ids::CategoryId;

/// A loaded category set with id, slug, and parent→children indexes.
///
/// Built once per load in a single pass; every query afterwards is a map
/// lookup or a walk over the children index.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    categories: Vec<Category>,
    by_id: HashMap<CategoryId, usize>,
    by_slug: HashMap<String, usize>,
    /// Children of each parent, ascending by `sort`.
    children: HashMap<CategoryId, Vec<usize>>,
    /// Categories without a (known) parent, ascending by `sort`.
    roots: Vec<usize>,
}

impl CategoryIndex {
    /// Index a category set.
    ///
    /// A category whose parent id does not exist in the set is treated as a
    /// root. On duplicate ids or slugs the first record wins the lookup.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut by_slug = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            by_id.entry(category.id.clone()).or_insert(i);
            if !category.slug.is_empty() {
                by_slug.entry(category.slug.clone()).or_insert(i);
            }
        }

        let mut children: HashMap<CategoryId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (i, category) in categories.iter().enumerate() {
            match &category.parent_id {
                Some(parent) if by_id.contains_key(parent) => {
                    children.entry(parent.clone()).or_default().push(i);
                }
                Some(parent) => {
                    warn!(category = %category.id, parent = %parent, "parent category missing, treating as root");
                    roots.push(i);
                }
                None => roots.push(i),
            }
        }

        // Stable sort keeps backend order among equal positions.
        roots.sort_by_key(|&i| categories[i].position());
        for siblings in children.values_mut() {
            siblings.sort_by_key(|&i| categories[i].position());
        }

        Self {
            categories,
            by_id,
            by_slug,
            children,
            roots,
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All categories in backend order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn by_id(&self, id: &CategoryId) -> Option<&Category> {
        self.by_id.get(id).map(|&i| &self.categories[i])
    }

    /// Look up a category by slug.
    pub fn by_slug(&self, slug: &str) -> Option<&Category> {
        self.by_slug.get(slug).map(|&i| &self.categories[i])
    }

    /// Resolve a slug to its category id.
    pub fn id_by_slug(&self, slug: &str) -> Option<CategoryId> {
        self.by_slug(slug).map(|c| c.id.clone())
    }

    /// Display name for a slug, falling back to the slug itself.
    pub fn name_by_slug<'a>(&'a self, slug: &'a str) -> &'a str {
        self.by_slug(slug).map_or(slug, |c| c.name.as_str())
    }

    /// Direct children of a category, ascending by `sort`.
    pub fn children_of(&self, id: &CategoryId) -> Vec<&Category> {
        self.children
            .get(id)
            .map(|siblings| siblings.iter().map(|&i| &self.categories[i]).collect())
            .unwrap_or_default()
    }

    /// Build the category forest.
    ///
    /// Every level is ascending by `sort`. Categories caught in a parent
    /// cycle are unreachable from any root and are left out.
    pub fn tree(&self) -> Vec<CategoryNode> {
        let mut visited = vec![false; self.categories.len()];
        let forest: Vec<CategoryNode> = self
            .roots
            .iter()
            .map(|&root| self.build_node(root, &mut visited))
            .collect();

        let unreachable = visited.iter().filter(|seen| !**seen).count();
        if unreachable > 0 {
            warn!(unreachable, "categories unreachable from any root, parent cycle suspected");
        }
        forest
    }

    fn build_node(&self, index: usize, visited: &mut [bool]) -> CategoryNode {
        visited[index] = true;
        let category = &self.categories[index];

        let mut children = Vec::new();
        if let Some(siblings) = self.children.get(&category.id) {
            for &child in siblings {
                if !visited[child] {
                    children.push(self.build_node(child, visited));
                }
            }
        }

        CategoryNode {
            category: category.clone(),
            children,
        }
    }

    /// Path from the root down to the category with this slug.
    ///
    /// Returns an empty path for an unknown slug, and also when the parent
    /// chain loops back on itself.
    pub fn breadcrumb(&self, slug: &str) -> Vec<Category> {
        let Some(&start) = self.by_slug.get(slug) else {
            return Vec::new();
        };

        let mut trail = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(index) = current {
            if !seen.insert(index) {
                warn!(slug, "parent cycle detected while building breadcrumb");
                return Vec::new();
            }
            let category = &self.categories[index];
            trail.push(category.clone());
            current = category
                .parent_id
                .as_ref()
                .and_then(|parent| self.by_id.get(parent).copied());
        }

        trail.reverse();
        trail
    }

    /// The category id plus every id reachable through child links.
    ///
    /// The requested id comes first, followed by descendants breadth-first.
    /// An unknown id yields just itself.
    pub fn descendant_ids(&self, id: &CategoryId) -> Vec<CategoryId> {
        let mut ids = vec![id.clone()];
        let mut seen: HashSet<CategoryId> = HashSet::from([id.clone()]);
        let mut queue = VecDeque::from([id.clone()]);

        while let Some(current) = queue.pop_front() {
            let Some(siblings) = self.children.get(&current) else {
                continue;
            };
            for &child in siblings {
                let child_id = &self.categories[child].id;
                if seen.insert(child_id.clone()) {
                    ids.push(child_id.clone());
                    queue.push_back(child_id.clone());
                }
            }
        }

        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn index() -> CategoryIndex {
        CategoryIndex::new(fixtures::categories())
    }

    fn slugs(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.category.slug.as_str()).collect()
    }

    fn collect_ids(nodes: &[CategoryNode], out: &mut Vec<CategoryId>) {
        for node in nodes {
            out.push(node.category.id.clone());
            collect_ids(&node.children, out);
        }
    }

    #[test]
    fn test_lookups() {
        let index = index();
        assert_eq!(index.id_by_slug("lamps"), Some(CategoryId::new("4")));
        assert_eq!(index.id_by_slug("nope"), None);
        assert_eq!(index.name_by_slug("lamps"), "Lamps");
        assert_eq!(index.name_by_slug("nope"), "nope");
        assert_eq!(index.by_id(&CategoryId::new("2")).map(|c| c.slug.as_str()), Some("lighting"));
        assert!(index.by_id(&CategoryId::new("99")).is_none());
    }

    #[test]
    fn test_tree_partitions_every_category() {
        let index = index();
        let tree = index.tree();

        let mut ids = Vec::new();
        collect_ids(&tree, &mut ids);
        ids.sort();
        let mut expected: Vec<_> = index.categories().iter().map(|c| c.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_tree_levels_sorted_by_position() {
        let tree = index().tree();
        assert_eq!(slugs(&tree), vec!["furniture", "lighting"]);

        let lighting = &tree[1];
        assert_eq!(slugs(&lighting.children), vec!["pendants", "lamps"]);

        let lamps = &lighting.children[1];
        assert_eq!(slugs(&lamps.children), vec!["desk-lamps"]);
    }

    #[test]
    fn test_missing_sort_counts_as_zero() {
        let index = CategoryIndex::new(vec![
            Category::new("1", "B", "b").with_sort(1),
            Category::new("2", "A", "a"),
            Category::new("3", "C", "c").with_sort(-1),
        ]);
        assert_eq!(slugs(&index.tree()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let index = CategoryIndex::new(vec![
            Category::new("1", "Root", "root"),
            Category::new("2", "Orphan", "orphan").with_parent("42"),
        ]);
        assert_eq!(index.tree().len(), 2);
        assert_eq!(index.breadcrumb("orphan").len(), 1);
    }

    #[test]
    fn test_breadcrumb_root_first() {
        let trail: Vec<String> = index()
            .breadcrumb("desk-lamps")
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(trail, vec!["lighting", "lamps", "desk-lamps"]);
    }

    #[test]
    fn test_breadcrumb_unknown_slug() {
        assert!(index().breadcrumb("missing").is_empty());
    }

    #[test]
    fn test_breadcrumb_cycle_is_empty() {
        let index = CategoryIndex::new(vec![
            Category::new("1", "A", "a").with_parent("3"),
            Category::new("2", "B", "b").with_parent("1"),
            Category::new("3", "C", "c").with_parent("2"),
        ]);
        assert!(index.breadcrumb("b").is_empty());
        assert!(index.tree().is_empty());
    }

    #[test]
    fn test_descendant_ids_include_self() {
        let index = index();
        let ids: HashSet<_> = index.descendant_ids(&CategoryId::new("2")).into_iter().collect();
        let expected: HashSet<_> = ["2", "3", "4", "6"].into_iter().map(CategoryId::new).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_descendant_ids_of_leaf() {
        let index = index();
        assert_eq!(
            index.descendant_ids(&CategoryId::new("6")),
            vec![CategoryId::new("6")]
        );
        assert_eq!(
            index.descendant_ids(&CategoryId::new("99")),
            vec![CategoryId::new("99")]
        );
    }

    #[test]
    fn test_descendant_ids_survive_cycle() {
        let index = CategoryIndex::new(vec![
            Category::new("1", "A", "a").with_parent("2"),
            Category::new("2", "B", "b").with_parent("1"),
        ]);
        let ids = index.descendant_ids(&CategoryId::new("1"));
        assert_eq!(ids, vec![CategoryId::new("1"), CategoryId::new("2")]);
    }
}
