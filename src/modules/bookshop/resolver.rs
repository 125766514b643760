//! Author-to-book reference resolution.

use bookshop_db::{BookId, Store};

use super::models::BookReference;

/// Resolve `references` against committed books, in listed order.
///
/// Null, negative and unknown ids are skipped. Repeated ids
/// are kept, one entry per reference.
pub fn resolve_books(
    store: &dyn Store,
    references: &[BookReference],
) -> bookshop_db::Result<Vec<BookId>> {
    let mut resolved = Vec::with_capacity(references.len());

    for reference in references {
        let Some(id) = reference.id.and_then(|raw| BookId::try_from(raw).ok()) else {
            tracing::debug!(reference = ?reference.id, "skipping unusable book reference");
            continue;
        };

        match store.find_book(id)? {
            Some(book) => resolved.push(book.id),
            None => tracing::debug!(book_id = %id, "skipping reference to missing book"),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshop_db::{Genre, MemoryStore, NewBook};
    use chrono::NaiveDate;

    fn store_with_books(count: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.stage_books(
            (0..count)
                .map(|i| NewBook {
                    name: format!("Volume {}", i + 1),
                    genre: Genre::Business,
                    price: 10.into(),
                    pages: 100,
                    published_on: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                })
                .collect(),
        );
        store.commit().unwrap();
        store
    }

    fn refs(ids: &[Option<i64>]) -> Vec<BookReference> {
        ids.iter().map(|&id| BookReference { id }).collect()
    }

    #[test]
    fn known_ids_resolve_in_listed_order() {
        let store = store_with_books(3);
        let resolved = resolve_books(&store, &refs(&[Some(3), Some(1)])).unwrap();
        assert_eq!(resolved, vec![BookId(3), BookId(1)]);
    }

    #[test]
    fn dangling_and_null_references_are_skipped() {
        let store = store_with_books(2);
        let resolved =
            resolve_books(&store, &refs(&[None, Some(999), Some(-4), Some(2)])).unwrap();
        assert_eq!(resolved, vec![BookId(2)]);
    }

    #[test]
    fn duplicate_references_are_kept() {
        let store = store_with_books(1);
        let resolved = resolve_books(&store, &refs(&[Some(1), Some(1)])).unwrap();
        assert_eq!(resolved, vec![BookId(1), BookId(1)]);
    }

    #[test]
    fn nothing_resolves_against_an_empty_store() {
        let store = MemoryStore::new();
        assert!(resolve_books(&store, &refs(&[Some(1)])).unwrap().is_empty());
    }
}
