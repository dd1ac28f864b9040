//! Asset URL resolution.

/// Resolves backend file ids to absolute asset URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    base_url: String,
}

impl AssetResolver {
    /// Create a resolver for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL assets are served under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a file id to its URL.
    ///
    /// A missing or blank id resolves to `None`, never to a dangling URL.
    pub fn resolve(&self, file_id: Option<&str>) -> Option<String> {
        match file_id.map(str::trim) {
            Some(id) if !id.is_empty() => Some(format!("{}/assets/{}", self.base_url, id)),
            _ => None,
        }
    }
}
