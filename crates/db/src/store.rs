//! Record store trait definition.
//!
//! A [`Store`] exposes committed records for reads and buffers new records
//! until [`Store::commit`] applies them as one unit.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::entities::{Author, Book, BookId, CommitSummary, NewAuthor, NewBook};
use crate::error::{self, StoreError};

/// Storage contract for the import and export pipelines.
///
/// Reads only ever see committed records; staged records become visible
/// after a successful [`Store::commit`].
pub trait Store: Send {
    /// Look up a committed book by id.
    ///
    /// Returns `Ok(None)` when no such book exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    fn find_book(&self, id: BookId) -> error::Result<Option<Book>>;

    /// Every committed book, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    fn books(&self) -> error::Result<Vec<Book>>;

    /// Every committed author, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    fn authors(&self) -> error::Result<Vec<Author>>;

    /// Buffer books for the next commit.
    fn stage_books(&mut self, books: Vec<NewBook>);

    /// Buffer authors (and their associations) for the next commit.
    fn stage_authors(&mut self, authors: Vec<NewAuthor>);

    /// Apply every staged record atomically.
    ///
    /// The staging buffer is emptied whether or not the commit succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the records could not be applied or
    /// persisted; committed state is then unchanged.
    fn commit(&mut self) -> error::Result<CommitSummary>;
}

/// Store handle shared between request handlers.
pub type SharedStore = Arc<Mutex<dyn Store>>;

/// Wrap a concrete store into a [`SharedStore`].
pub fn shared<S: Store + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Acquire exclusive access to a shared store.
///
/// # Errors
///
/// Returns [`StoreError::LockPoisoned`] if a previous holder panicked.
pub fn lock(store: &SharedStore) -> error::Result<MutexGuard<'_, dyn Store + 'static>> {
    store.lock().map_err(|_| StoreError::LockPoisoned)
}
