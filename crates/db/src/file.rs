//! Store persisted as a single JSON snapshot file.
//!
//! Every commit writes the full next snapshot to a sibling temporary file
//! and renames it over the original, so a crash mid-write never leaves a
//! half-written snapshot behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::entities::{Author, Book, BookId, CommitSummary, NewAuthor, NewBook};
use crate::error::Result;
use crate::snapshot::{Snapshot, Staged};
use crate::store::Store;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    committed: Snapshot,
    staged: Staged,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the file exists but
    /// cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let committed = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Snapshot::default()
        };

        tracing::info!(path = %path.display(), "opened json snapshot store");

        Ok(Self {
            path,
            committed,
            staged: Staged::default(),
        })
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
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
        self.persist(&next)?;
        self.committed = next;

        tracing::debug!(
            path = %self.path.display(),
            books = summary.books.len(),
            authors = summary.authors.len(),
            "snapshot committed"
        );
        Ok(summary)
    }
}
