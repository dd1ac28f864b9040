//! REST backend over `reqwest`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{Backend, FetchError, FilterExpression, RecordQuery, TimeoutConfig};

/// Response envelope: every payload arrives under `data`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Backend client for a Directus-style REST API.
///
/// Records are read from `GET {base}/items/{collection}`; counts use the
/// same endpoint with `aggregate[count]=*`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for an absolute base URL.
    pub fn new(base_url: impl Into<String>, timeout: &TimeoutConfig) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self, collection: &str) -> String {
        format!("{}/items/{}", self.base_url, collection)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, FetchError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_envelope(status, url, &body)
    }
}

/// Check the status and unwrap the `data` payload of a response body.
fn decode_envelope<T: DeserializeOwned>(status: u16, url: &str, body: &[u8]) -> Result<T, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            status,
            url: url.to_string(),
        });
    }

    let envelope: DataEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.data)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn query_records(
        &self,
        collection: &str,
        query: &RecordQuery,
    ) -> Result<Vec<Value>, FetchError> {
        let params = query.to_params()?;
        debug!(collection, ?params, "querying records");

        let records: Vec<Value> = self.get(&self.items_url(collection), &params).await?;
        debug!(collection, count = records.len(), "records received");
        Ok(records)
    }

    async fn aggregate_count(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<u64, FetchError> {
        let mut params = vec![("aggregate[count]".to_string(), "*".to_string())];
        if !filter.is_all() {
            params.push(("filter".to_string(), serde_json::to_string(filter)?));
        }
        debug!(collection, ?params, "counting records");

        let rows: Vec<Value> = self.get(&self.items_url(collection), &params).await?;
        rows.first().and_then(parse_count).ok_or_else(|| {
            FetchError::Deserialization(format!("missing count in aggregate for {}", collection))
        })
    }
}

/// Counts come back as numbers or numeric strings depending on the database.
fn parse_count(row: &Value) -> Option<u64> {
    match row.get("count")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
