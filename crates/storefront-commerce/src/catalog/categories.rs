//! Category tree service with a single-flight, load-once cache.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use storefront_data::{Backend, RecordQuery};
use tracing::{debug, info, warn};

use crate::catalog::{Category, CategoryIndex, CategoryNode};
use crate::error::StoreError;
use crate::ids::CategoryId;

/// Backend collection holding categories.
pub const CATEGORY_COLLECTION: &str = "categories";

/// Fields requested for every category record.
pub const CATEGORY_FIELDS: [&str; 5] = ["id", "name", "slug", "parent", "sort"];

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<CategoryIndex>, StoreError>>>;

enum LoadState {
    Idle,
    Loading { generation: u64, pending: SharedLoad },
    Loaded(Arc<CategoryIndex>),
}

struct Inner {
    state: LoadState,
    generation: u64,
}

/// Loads the category set once per session and answers tree queries on it.
///
/// Concurrent `load` calls share one in-flight request. A failed load
/// leaves the service unloaded so the next call retries. The lookup methods
/// read whatever set is currently loaded and fall back to empty answers
/// before the first successful load.
pub struct CategoryService {
    backend: Arc<dyn Backend>,
    inner: Mutex<Inner>,
}

impl CategoryService {
    /// Create a service reading from the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner {
                state: LoadState::Idle,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the category set, or return the cached one.
    pub async fn load(&self) -> Result<Arc<CategoryIndex>, StoreError> {
        let (generation, pending) = {
            let mut inner = self.lock();
            match &inner.state {
                LoadState::Loaded(index) => return Ok(Arc::clone(index)),
                LoadState::Loading {
                    generation,
                    pending,
                } => {
                    debug!(generation, "joining in-flight category load");
                    (*generation, pending.clone())
                }
                LoadState::Idle => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let pending = fetch_categories(Arc::clone(&self.backend))
                        .boxed()
                        .shared();
                    inner.state = LoadState::Loading {
                        generation,
                        pending: pending.clone(),
                    };
                    (generation, pending)
                }
            }
        };

        let result = pending.await;

        // A refresh while this load was in flight discards its result.
        let mut inner = self.lock();
        if matches!(&inner.state, LoadState::Loading { generation: current, .. } if *current == generation)
        {
            inner.state = match &result {
                Ok(index) => LoadState::Loaded(Arc::clone(index)),
                Err(_) => LoadState::Idle,
            };
        }
        result
    }

    /// Discard the cached set; the next access fetches again.
    pub fn refresh(&self) {
        self.lock().state = LoadState::Idle;
    }

    /// Discard the cached set and load it again.
    pub async fn reload(&self) -> Result<Arc<CategoryIndex>, StoreError> {
        self.refresh();
        self.load().await
    }

    /// Check if a category set is loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.lock().state, LoadState::Loaded(_))
    }

    /// Check if a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, LoadState::Loading { .. })
    }

    /// The currently loaded set, if any.
    pub fn snapshot(&self) -> Option<Arc<CategoryIndex>> {
        match &self.lock().state {
            LoadState::Loaded(index) => Some(Arc::clone(index)),
            _ => None,
        }
    }

    /// Resolve a slug to its category id.
    pub fn id_by_slug(&self, slug: &str) -> Option<CategoryId> {
        self.snapshot().and_then(|index| index.id_by_slug(slug))
    }

    /// Display name for a slug, falling back to the slug itself.
    pub fn name_by_slug(&self, slug: &str) -> String {
        self.snapshot()
            .map(|index| index.name_by_slug(slug).to_string())
            .unwrap_or_else(|| slug.to_string())
    }

    /// Look up a category by id.
    pub fn by_id(&self, id: &CategoryId) -> Option<Category> {
        self.snapshot().and_then(|index| index.by_id(id).cloned())
    }

    /// The category forest, each level ascending by `sort`.
    pub fn tree(&self) -> Vec<CategoryNode> {
        self.snapshot().map(|index| index.tree()).unwrap_or_default()
    }

    /// Path from the root down to the category with this slug.
    pub fn breadcrumb(&self, slug: &str) -> Vec<Category> {
        self.snapshot()
            .map(|index| index.breadcrumb(slug))
            .unwrap_or_default()
    }

    /// The category id plus all of its descendants.
    pub fn descendant_ids(&self, id: &CategoryId) -> Vec<CategoryId> {
        match self.snapshot() {
            Some(index) => index.descendant_ids(id),
            None => vec![id.clone()],
        }
    }
}

async fn fetch_categories(backend: Arc<dyn Backend>) -> Result<Arc<CategoryIndex>, StoreError> {
    let query = RecordQuery::new()
        .fields(CATEGORY_FIELDS)
        .sort("sort")
        .limit(RecordQuery::NO_LIMIT);

    let records = backend
        .query_records(CATEGORY_COLLECTION, &query)
        .await
        .map_err(|e| {
            warn!(error = %e, "category load failed");
            StoreError::Load(e.to_string())
        })?;

    let categories: Vec<Category> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(category) => Some(category),
            Err(e) => {
                warn!(error = %e, "skipping malformed category record");
                None
            }
        })
        .collect();

    info!(count = categories.len(), "categories loaded");
    Ok(Arc::new(CategoryIndex::new(categories)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockBackend};

    fn service() -> (Arc<MockBackend>, CategoryService) {
        let backend = Arc::new(
            MockBackend::new().with_records(CATEGORY_COLLECTION, fixtures::category_records()),
        );
        let service = CategoryService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test]
    async fn test_load_once() {
        let (backend, service) = service();

        let first = service.load().await.unwrap();
        let second = service.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 6);
        assert_eq!(backend.query_calls(), 1);
        assert!(service.is_loaded());
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_request() {
        let (backend, service) = service();
        let release = backend.gate(CATEGORY_COLLECTION, 0);

        let (a, b, _) = tokio::join!(service.load(), service.load(), async {
            tokio::task::yield_now().await;
            let _ = release.send(());
        });

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(backend.query_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_can_retry() {
        let (backend, service) = service();
        backend.set_failing(true);

        let err = service.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Load(_)));
        assert!(!service.is_loaded());
        assert!(!service.is_loading());

        backend.set_failing(false);
        assert_eq!(service.load().await.unwrap().len(), 6);
        assert_eq!(backend.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_forces_refetch() {
        let (backend, service) = service();
        service.load().await.unwrap();

        service.refresh();
        assert!(!service.is_loaded());
        assert!(service.tree().is_empty());

        service.load().await.unwrap();
        assert_eq!(backend.query_calls(), 2);

        service.reload().await.unwrap();
        assert_eq!(backend.query_calls(), 3);
    }

    #[tokio::test]
    async fn test_refresh_discards_in_flight_result() {
        let (backend, service) = service();
        let release = backend.gate(CATEGORY_COLLECTION, 0);

        let (result, _) = tokio::join!(service.load(), async {
            tokio::task::yield_now().await;
            service.refresh();
            let _ = release.send(());
        });

        assert!(result.is_ok());
        assert!(!service.is_loaded());
    }

    #[tokio::test]
    async fn test_lookups_before_and_after_load() {
        let (_backend, service) = service();

        assert_eq!(service.id_by_slug("lamps"), None);
        assert_eq!(service.name_by_slug("lamps"), "lamps");
        assert_eq!(
            service.descendant_ids(&CategoryId::new("2")),
            vec![CategoryId::new("2")]
        );

        service.load().await.unwrap();

        assert_eq!(service.id_by_slug("lamps"), Some(CategoryId::new("4")));
        assert_eq!(service.name_by_slug("lamps"), "Lamps");
        assert_eq!(service.name_by_slug("unknown"), "unknown");
        assert_eq!(
            service.by_id(&CategoryId::new("5")).map(|c| c.name),
            Some("Desks".to_string())
        );
        assert_eq!(service.breadcrumb("desk-lamps").len(), 3);
        assert_eq!(service.tree().len(), 2);
        assert_eq!(service.descendant_ids(&CategoryId::new("2")).len(), 4);
    }

    #[tokio::test]
    async fn test_requests_every_category() {
        let (backend, service) = service();
        service.load().await.unwrap();

        let query = backend.last_query().unwrap();
        assert_eq!(query.limit, Some(RecordQuery::NO_LIMIT));
        assert_eq!(query.fields, CATEGORY_FIELDS.to_vec());
    }
}
