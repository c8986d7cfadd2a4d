//! Mock record store for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CardStore, StoreError, StoreFuture};
use crate::card::CardRecord;
use crate::criteria::SearchCriteria;

/// A hand-rolled mock implementing [`CardStore`] for tests.
///
/// Supports:
/// - A fixed set of records returned by every search, in the given order.
/// - `fetch_by_id` answered from the same records.
/// - Simulated unavailability and per-call latency.
/// - Call counting via [`call_count()`](MockCardStore::call_count), or via a
///   shared [`call_counter()`](MockCardStore::call_counter) that outlives the mock.
pub struct MockCardStore {
    records: Vec<CardRecord>,
    unavailable: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockCardStore {
    /// Create a mock whose searches return `records` unchanged.
    pub fn new(records: Vec<CardRecord>) -> Self {
        Self {
            records,
            unavailable: false,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock where every call fails with [`StoreError::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many store calls have been made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle on the call counter. Only the mock and the returned
    /// handles hold it, so its strong count shows whether the mock is alive.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn respond<T: Send + 'static>(&self, value: T) -> StoreFuture<'_, T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let unavailable = self.unavailable;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            if unavailable {
                return Err(StoreError::Unavailable("mock store offline".into()));
            }
            Ok(value)
        })
    }
}

impl CardStore for MockCardStore {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_by_id(&self, id: i64) -> StoreFuture<'_, Option<CardRecord>> {
        let found = self.records.iter().find(|r| r.id == id).cloned();
        self.respond(found)
    }

    fn search<'a>(&'a self, _criteria: &'a SearchCriteria) -> StoreFuture<'a, Vec<CardRecord>> {
        self.respond(self.records.clone())
    }
}
