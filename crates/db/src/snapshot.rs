//! Committed store state and the transition applied by a commit.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{
    Author, AuthorBook, AuthorId, Book, BookId, CommitSummary, Genre, NewAuthor, NewBook,
};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookRow {
    id: BookId,
    name: String,
    genre: Genre,
    price: BigDecimal,
    pages: u32,
    published_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AuthorRow {
    id: AuthorId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

/// Records waiting for the next commit.
#[derive(Debug, Default)]
pub(crate) struct Staged {
    pub books: Vec<NewBook>,
    pub authors: Vec<NewAuthor>,
}

impl Staged {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.authors.is_empty()
    }
}

/// On-disk form of a [`Snapshot`].
#[derive(Debug, Default, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    books: Vec<BookRow>,
    #[serde(default)]
    authors: Vec<AuthorRow>,
    #[serde(default)]
    author_books: Vec<AuthorBook>,
}

/// Full committed state. Rows are kept in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSnapshot")]
pub(crate) struct Snapshot {
    books: Vec<BookRow>,
    authors: Vec<AuthorRow>,
    author_books: Vec<AuthorBook>,
    /// Authors per book, in association order. Rebuilt on load.
    #[serde(skip)]
    authors_by_book: HashMap<BookId, Vec<AuthorId>>,
}

impl From<StoredSnapshot> for Snapshot {
    fn from(stored: StoredSnapshot) -> Self {
        let mut authors_by_book: HashMap<BookId, Vec<AuthorId>> = HashMap::new();
        for link in &stored.author_books {
            authors_by_book
                .entry(link.book_id)
                .or_default()
                .push(link.author_id);
        }

        Self {
            books: stored.books,
            authors: stored.authors,
            author_books: stored.author_books,
            authors_by_book,
        }
    }
}

impl Snapshot {
    pub fn find_book(&self, id: BookId) -> Option<Book> {
        let index = self.books.binary_search_by_key(&id, |row| row.id).ok()?;
        Some(book_from_row(&self.books[index], self.book_authors(id)))
    }

    pub fn books(&self) -> Vec<Book> {
        self.books
            .iter()
            .map(|row| book_from_row(row, self.book_authors(row.id)))
            .collect()
    }

    fn book_authors(&self, id: BookId) -> Vec<AuthorId> {
        self.authors_by_book.get(&id).cloned().unwrap_or_default()
    }

    pub fn authors(&self) -> Vec<Author> {
        let mut books_by_author: HashMap<AuthorId, Vec<BookId>> = HashMap::new();
        for link in &self.author_books {
            books_by_author
                .entry(link.author_id)
                .or_default()
                .push(link.book_id);
        }

        self.authors
            .iter()
            .map(|row| Author {
                id: row.id,
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                email: row.email.clone(),
                phone: row.phone.clone(),
                book_ids: books_by_author.remove(&row.id).unwrap_or_default(),
            })
            .collect()
    }

    /// Append staged records, assigning ids after the highest existing one.
    ///
    /// Fails without touching `self` if any staged association points at a
    /// book that is not already committed.
    pub fn apply(&mut self, staged: Staged) -> Result<CommitSummary> {
        for author in &staged.authors {
            let missing = author.books.iter().find(|id| {
                self.books
                    .binary_search_by_key(*id, |row| row.id)
                    .is_err()
            });
            if let Some(missing) = missing {
                return Err(StoreError::DanglingReference {
                    author: author.full_name(),
                    book_id: *missing,
                });
            }
        }

        let mut next_book = self.books.last().map_or(1, |row| row.id.0 + 1);
        let mut next_author = self.authors.last().map_or(1, |row| row.id.0 + 1);
        let mut summary = CommitSummary::default();

        for book in staged.books {
            let id = BookId(next_book);
            next_book += 1;
            self.books.push(BookRow {
                id,
                name: book.name,
                genre: book.genre,
                price: book.price,
                pages: book.pages,
                published_on: book.published_on,
            });
            summary.books.push(id);
        }

        for author in staged.authors {
            let id = AuthorId(next_author);
            next_author += 1;
            for book_id in author.books {
                self.author_books.push(AuthorBook {
                    author_id: id,
                    book_id,
                });
                self.authors_by_book.entry(book_id).or_default().push(id);
                summary.associations += 1;
            }
            self.authors.push(AuthorRow {
                id,
                first_name: author.first_name,
                last_name: author.last_name,
                email: author.email,
                phone: author.phone,
            });
            summary.authors.push(id);
        }

        Ok(summary)
    }
}

fn book_from_row(row: &BookRow, author_ids: Vec<AuthorId>) -> Book {
    Book {
        id: row.id,
        name: row.name.clone(),
        genre: row.genre,
        price: row.price.clone(),
        pages: row.pages,
        published_on: row.published_on,
        author_ids,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::str::FromStr;

    use super::*;

    pub fn new_book(name: &str, genre: Genre, price: &str) -> NewBook {
        NewBook {
            name: name.to_string(),
            genre,
            price: BigDecimal::from_str(price).unwrap(),
            pages: 320,
            published_on: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
        }
    }

    pub fn new_author(first: &str, email: &str, books: Vec<BookId>) -> NewAuthor {
        NewAuthor {
            first_name: first.to_string(),
            last_name: "Writer".to_string(),
            email: email.to_string(),
            phone: "088-812-3456".to_string(),
            books,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{new_author, new_book};
    use super::*;

    fn seeded() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot
            .apply(Staged {
                books: vec![
                    new_book("Dune", Genre::Science, "15.50"),
                    new_book("Emma", Genre::Biography, "9.99"),
                ],
                authors: vec![],
            })
            .unwrap();
        snapshot
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let snapshot = seeded();
        let ids: Vec<_> = snapshot.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BookId(1), BookId(2)]);
    }

    #[test]
    fn associations_are_visible_from_both_sides() {
        let mut snapshot = seeded();
        let summary = snapshot
            .apply(Staged {
                books: vec![],
                authors: vec![new_author("Frank", "frank@example.com", vec![BookId(1)])],
            })
            .unwrap();

        assert_eq!(summary.authors, vec![AuthorId(1)]);
        assert_eq!(summary.associations, 1);

        let authors = snapshot.authors();
        assert_eq!(authors[0].book_ids, vec![BookId(1)]);
        let dune = snapshot.find_book(BookId(1)).unwrap();
        assert_eq!(dune.author_ids, vec![AuthorId(1)]);
        assert!(snapshot.find_book(BookId(2)).unwrap().author_ids.is_empty());
    }

    #[test]
    fn repeated_references_become_repeated_associations() {
        let mut snapshot = seeded();
        snapshot
            .apply(Staged {
                books: vec![],
                authors: vec![new_author(
                    "Frank",
                    "frank@example.com",
                    vec![BookId(2), BookId(2)],
                )],
            })
            .unwrap();

        assert_eq!(snapshot.authors()[0].book_ids, vec![BookId(2), BookId(2)]);
    }

    #[test]
    fn lookups_see_associations_after_reload() {
        let mut snapshot = seeded();
        snapshot
            .apply(Staged {
                books: vec![],
                authors: vec![
                    new_author("Frank", "frank@example.com", vec![BookId(2)]),
                    new_author("Brian", "brian@example.com", vec![BookId(2), BookId(1)]),
                ],
            })
            .unwrap();

        let raw = serde_json::to_string(&snapshot).unwrap();
        assert!(!raw.contains("authors_by_book"));
        let reloaded: Snapshot = serde_json::from_str(&raw).unwrap();

        assert_eq!(reloaded, snapshot);
        assert_eq!(
            reloaded.find_book(BookId(2)).unwrap().author_ids,
            vec![AuthorId(1), AuthorId(2)]
        );
        assert_eq!(
            reloaded.find_book(BookId(1)).unwrap().author_ids,
            vec![AuthorId(2)]
        );
        assert!(reloaded.find_book(BookId(3)).is_none());
    }

    #[test]
    fn dangling_reference_leaves_snapshot_untouched() {
        let mut snapshot = seeded();
        let before = snapshot.clone();

        let err = snapshot
            .apply(Staged {
                books: vec![new_book("Ubik", Genre::Science, "7.00")],
                authors: vec![new_author("Philip", "pkd@example.com", vec![BookId(99)])],
            })
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::DanglingReference { book_id: BookId(99), .. }
        ));
        assert_eq!(snapshot, before);
    }
}
