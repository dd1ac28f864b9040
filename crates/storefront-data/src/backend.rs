//! The backend contract consumed by the storefront core.

use async_trait::async_trait;
use serde_json::Value;

use crate::{FetchError, FilterExpression, RecordQuery};

/// A remote content store answering read and count queries.
///
/// Failures are always `Err`; an empty result set is `Ok(vec![])`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read raw records from a collection.
    async fn query_records(
        &self,
        collection: &str,
        query: &RecordQuery,
    ) -> Result<Vec<Value>, FetchError>;

    /// Count the records matching a filter, ignoring pagination.
    async fn aggregate_count(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<u64, FetchError>;
}
