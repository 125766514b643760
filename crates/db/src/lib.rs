//! Record storage for the bookshop pipelines.
//!
//! Provides the [`Store`] trait with an in-memory backend and a JSON
//! snapshot backend, plus [`open`] to build whichever one the settings ask
//! for.

pub mod entities;
pub mod error;
pub mod file;
pub mod memory;
mod snapshot;
pub mod store;

use bookshop_kernel::settings::{DatabaseSettings, StoreBackend};

pub use entities::{
    Author, AuthorBook, AuthorId, Book, BookId, CommitSummary, Genre, NewAuthor, NewBook,
};
pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{lock, shared, SharedStore, Store};

/// Build the store selected by `settings`.
///
/// # Errors
///
/// Returns [`StoreError`] if a file-backed snapshot exists but cannot be loaded.
pub fn open(settings: &DatabaseSettings) -> Result<SharedStore> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory record store");
            Ok(shared(MemoryStore::new()))
        }
        StoreBackend::File => Ok(shared(JsonFileStore::open(&settings.path)?)),
    }
}
