//! Record queries.

use crate::FilterExpression;

/// A read query against one backend collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    /// Filter predicate.
    pub filter: FilterExpression,
    /// Maximum number of records; `RecordQuery::NO_LIMIT` requests every record.
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: Option<u64>,
    /// Sort keys; a leading `-` sorts descending.
    pub sort: Vec<String>,
    /// Field projection, including nested association paths
    /// (`tags.tags_id.name`, `variants.*`).
    pub fields: Vec<String>,
}

impl RecordQuery {
    /// Limit value asking the backend for every matching record.
    pub const NO_LIMIT: i64 = -1;

    /// Create an unconstrained query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter.
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = filter;
        self
    }

    /// Set the limit.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Add a sort key.
    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    /// Set the field projection.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Encode as URL query parameters.
    pub fn to_params(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut params = Vec::new();
        if !self.filter.is_all() {
            params.push(("filter".to_string(), serde_json::to_string(&self.filter)?));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if !self.sort.is_empty() {
            params.push(("sort".to_string(), self.sort.join(",")));
        }
        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_skip_unset_parts() {
        let params = RecordQuery::new().to_params().unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_unlimited_query() {
        let params = RecordQuery::new()
            .limit(RecordQuery::NO_LIMIT)
            .to_params()
            .unwrap();
        assert_eq!(params, vec![("limit".to_string(), "-1".to_string())]);
    }

    #[test]
    fn test_params_encoding() {
        let query = RecordQuery::new()
            .filter(FilterExpression::eq("slug", "oak-desk"))
            .limit(12)
            .offset(24)
            .sort("-date_created")
            .fields(["id", "variants.*"]);

        let params = query.to_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("filter".to_string(), r#"{"slug":{"_eq":"oak-desk"}}"#.to_string()),
                ("limit".to_string(), "12".to_string()),
                ("offset".to_string(), "24".to_string()),
                ("sort".to_string(), "-date_created".to_string()),
                ("fields".to_string(), "id,variants.*".to_string()),
            ]
        );
    }
}
