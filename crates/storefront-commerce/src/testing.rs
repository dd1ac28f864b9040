//! In-memory backend and fixture data for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use storefront_data::{Backend, FetchError, FilterExpression, RecordQuery};
use tokio::sync::oneshot;

/// Backend serving fixed record sets.
///
/// Queries can be held back with [`MockBackend::gate`] so tests control the
/// order in which concurrent requests complete.
#[derive(Default)]
pub struct MockBackend {
    records: HashMap<String, Vec<Value>>,
    gates: Mutex<Vec<(String, u64, oneshot::Receiver<()>)>>,
    failing: AtomicBool,
    query_calls: AtomicUsize,
    count_calls: AtomicUsize,
    calls_by_collection: Mutex<HashMap<String, usize>>,
    last_query: Mutex<Option<RecordQuery>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, collection: &str, records: Vec<Value>) -> Self {
        self.records.insert(collection.to_string(), records);
        self
    }

    /// Hold the next query on `collection` at `offset` until the returned
    /// sender fires (or is dropped).
    pub fn gate(&self, collection: &str, offset: u64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .push((collection.to_string(), offset, rx));
        tx
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls_for(&self, collection: &str) -> usize {
        self.calls_by_collection
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<RecordQuery> {
        self.last_query.lock().unwrap().clone()
    }

    fn take_gate(&self, collection: &str, offset: u64) -> Option<oneshot::Receiver<()>> {
        let mut gates = self.gates.lock().unwrap();
        let position = gates
            .iter()
            .position(|(c, o, _)| c == collection && *o == offset)?;
        Some(gates.remove(position).2)
    }

    fn check_failing(&self) -> Result<(), FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Http {
                status: 503,
                url: "mock://backend".to_string(),
            });
        }
        Ok(())
    }

    fn matching(&self, collection: &str, filter: &FilterExpression) -> Vec<Value> {
        self.records
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn query_records(
        &self,
        collection: &str,
        query: &RecordQuery,
    ) -> Result<Vec<Value>, FetchError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_collection
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default() += 1;
        *self.last_query.lock().unwrap() = Some(query.clone());

        let offset = query.offset.unwrap_or(0);
        if let Some(gate) = self.take_gate(collection, offset) {
            let _ = gate.await;
        }
        self.check_failing()?;

        let records = self.matching(collection, &query.filter).into_iter();
        let records = records.skip(offset as usize);
        Ok(match query.limit {
            Some(limit) if limit >= 0 => records.take(limit as usize).collect(),
            _ => records.collect(),
        })
    }

    async fn aggregate_count(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<u64, FetchError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(self.matching(collection, filter).len() as u64)
    }
}

pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::Category;

    /// Two root trees, deliberately out of order:
    ///
    /// ```text
    /// Furniture (1)      Lighting (2)
    /// └── Desks (5)      ├── Pendants (3)
    ///                    └── Lamps (4)
    ///                        └── Desk Lamps (6)
    /// ```
    pub fn category_records() -> Vec<Value> {
        vec![
            json!({"id": 6, "name": "Desk Lamps", "slug": "desk-lamps", "parent": 4, "sort": 1}),
            json!({"id": 4, "name": "Lamps", "slug": "lamps", "parent": 2, "sort": 2}),
            json!({"id": 2, "name": "Lighting", "slug": "lighting", "parent": null, "sort": 2}),
            json!({"id": 5, "name": "Desks", "slug": "desks", "parent": {"id": 1}, "sort": null}),
            json!({"id": 3, "name": "Pendants", "slug": "pendants", "parent": 2, "sort": 1}),
            json!({"id": 1, "name": "Furniture", "slug": "furniture", "parent": null, "sort": 1}),
        ]
    }

    pub fn categories() -> Vec<Category> {
        category_records()
            .into_iter()
            .map(|record| serde_json::from_value(record).unwrap())
            .collect()
    }

    /// Products `1..=count`.
    ///
    /// Primary category cycles Pendants, Lamps, Desks. Every fifth product
    /// is also filed under Desk Lamps and every sixth carries the featured
    /// tag. The first variant is priced at the product number.
    pub fn product_records(count: u64) -> Vec<Value> {
        (1..=count).map(product_record).collect()
    }

    fn product_record(i: u64) -> Value {
        let category = match i % 3 {
            0 => json!({"id": 5, "name": "Desks", "slug": "desks"}),
            1 => json!({"id": 3, "name": "Pendants", "slug": "pendants"}),
            _ => json!({"id": 4, "name": "Lamps", "slug": "lamps"}),
        };
        let categories = if i % 5 == 0 {
            json!([{"categories_id": {"id": 6, "name": "Desk Lamps", "slug": "desk-lamps"}}])
        } else {
            json!([])
        };
        let tags = if i % 6 == 0 {
            json!([{"tags_id": {"name": "精選", "color": "#f59e0b"}}])
        } else {
            json!([])
        };

        json!({
            "id": i,
            "name": format!("Product {i}"),
            "slug": format!("product-{i}"),
            "short_description": format!("Item number {i}"),
            "description": null,
            "image": format!("file-{i}"),
            "category": category,
            "categories": categories,
            "tags": tags,
            "variants": [
                {"id": i * 10, "sku": format!("SKU-{i}"), "price": i, "stock": 5, "status": "published"},
                {"id": i * 10 + 1, "sku": format!("SKU-{i}-B"), "price": null, "stock": 0}
            ],
            "gallery": []
        })
    }
}
