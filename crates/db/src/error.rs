//! Store error types.

use crate::entities::BookId;

/// Errors produced by [`Store`](crate::Store) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// File-system failure while reading or writing a snapshot.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A staged author points at a book that is not in the store.
    #[error("author {author} references missing book {book_id}")]
    DanglingReference { author: String, book_id: BookId },

    /// Shared store mutex was poisoned by a panicked thread.
    #[error("record store lock poisoned")]
    LockPoisoned,
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_reference_names_both_sides() {
        let err = StoreError::DanglingReference {
            author: "Jane Doe".to_string(),
            book_id: BookId(42),
        };
        assert_eq!(err.to_string(), "author Jane Doe references missing book 42");
    }

    #[test]
    fn lock_poisoned_displays() {
        assert_eq!(
            StoreError::LockPoisoned.to_string(),
            "record store lock poisoned"
        );
    }

    #[test]
    fn io_error_wraps() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = StoreError::from(inner);
        assert!(err.to_string().contains("i/o"));
    }
}
