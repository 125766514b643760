//! Volatile store used for tests and throwaway runs.

use crate::entities::{Author, Book, BookId, CommitSummary, NewAuthor, NewBook};
use crate::error::Result;
use crate::snapshot::{Snapshot, Staged};
use crate::store::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: Snapshot,
    staged: Staged,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn find_book(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.committed.find_book(id))
    }

    fn books(&self) -> Result<Vec<Book>> {
        Ok(self.committed.books())
    }

    fn authors(&self) -> Result<Vec<Author>> {
        Ok(self.committed.authors())
    }

    fn stage_books(&mut self, books: Vec<NewBook>) {
        self.staged.books.extend(books);
    }

    fn stage_authors(&mut self, authors: Vec<NewAuthor>) {
        self.staged.authors.extend(authors);
    }

    fn commit(&mut self) -> Result<CommitSummary> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(CommitSummary::default());
        }

        let mut next = self.committed.clone();
        let summary = next.apply(staged)?;
        self.committed = next;

        tracing::debug!(
            books = summary.books.len(),
            authors = summary.authors.len(),
            associations = summary.associations,
            "memory store committed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Genre;
    use crate::snapshot::fixtures::{new_author, new_book};

    #[test]
    fn staged_records_are_invisible_until_commit() {
        let mut store = MemoryStore::new();
        store.stage_books(vec![new_book("Dune", Genre::Science, "15.50")]);

        assert!(store.books().unwrap().is_empty());
        assert!(store.find_book(BookId(1)).unwrap().is_none());

        let summary = store.commit().unwrap();
        assert_eq!(summary.books, vec![BookId(1)]);
        assert_eq!(store.find_book(BookId(1)).unwrap().unwrap().name, "Dune");
    }

    #[test]
    fn failed_commit_keeps_state_and_clears_staging() {
        let mut store = MemoryStore::new();
        store.stage_books(vec![new_book("Dune", Genre::Science, "15.50")]);
        store.commit().unwrap();

        store.stage_books(vec![new_book("Ubik", Genre::Science, "7.00")]);
        store.stage_authors(vec![new_author("Philip", "pkd@example.com", vec![BookId(9)])]);
        assert!(store.commit().is_err());

        assert_eq!(store.books().unwrap().len(), 1);
        assert!(store.authors().unwrap().is_empty());
        assert!(store.commit().unwrap().is_empty());
    }
}
