//! Record store contract and implementations.

pub mod memory;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::card::CardRecord;
use crate::criteria::SearchCriteria;

pub use memory::MemoryCardStore;

/// Boxed future returned by [`CardStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("card file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of card records.
///
/// A handle is owned by one screen entry and dropped when that entry ends.
pub trait CardStore: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Look up a single printing. `Ok(None)` means the id is unknown.
    fn fetch_by_id(&self, id: i64) -> StoreFuture<'_, Option<CardRecord>>;

    /// Run a structured search. Results come back sorted by name.
    fn search<'a>(&'a self, criteria: &'a SearchCriteria) -> StoreFuture<'a, Vec<CardRecord>>;
}

impl<S: CardStore + ?Sized> CardStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_by_id(&self, id: i64) -> StoreFuture<'_, Option<CardRecord>> {
        (**self).fetch_by_id(id)
    }

    fn search<'a>(&'a self, criteria: &'a SearchCriteria) -> StoreFuture<'a, Vec<CardRecord>> {
        (**self).search(criteria)
    }
}
