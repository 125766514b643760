//! Aggregated export views.
//!
//! Both views load every relevant record first and sort in memory. Orders
//! are total so the output does not depend on the order the store returns
//! records in.

use std::cmp::Ordering;
use std::collections::HashMap;

use bookshop_db::{Book, BookId, Genre, Store, StoreError};
use chrono::NaiveDate;
use thiserror::Error;

use super::codec::{self, CodecError};
use super::models::{AuthorBookProjection, AuthorProjection, OldBookProjection};
use crate::utils::{format_price, format_short_date};

/// Upper bound on the oldest science books view.
pub const OLDEST_BOOKS_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error("failed to read records: {0}")]
    Store(#[from] StoreError),
}

/// Every author with their books, most books first.
///
/// Authors: book count descending, then full name ascending. Books within an
/// author: price descending, then name, then id.
pub fn prolific_authors(store: &dyn Store) -> Result<Vec<AuthorProjection>, StoreError> {
    let books: HashMap<BookId, Book> = store
        .books()?
        .into_iter()
        .map(|book| (book.id, book))
        .collect();
    let authors = store.authors()?;

    let mut ranked: Vec<_> = authors
        .iter()
        .map(|author| {
            let mut shelf: Vec<&Book> = author
                .book_ids
                .iter()
                .filter_map(|id| books.get(id))
                .collect();
            shelf.sort_by(|a, b| by_price_desc(a, b));
            (author, author.full_name(), shelf)
        })
        .collect();

    ranked.sort_by(|(a, a_name, a_books), (b, b_name, b_books)| {
        b_books
            .len()
            .cmp(&a_books.len())
            .then_with(|| a_name.cmp(b_name))
            .then_with(|| {
                let left = a_books.iter().map(|book| (&book.name, &book.price));
                let right = b_books.iter().map(|book| (&book.name, &book.price));
                left.cmp(right)
            })
            .then_with(|| a.email.cmp(&b.email))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(ranked
        .into_iter()
        .map(|(_, author_name, shelf)| AuthorProjection {
            author_name,
            books: shelf
                .into_iter()
                .map(|book| AuthorBookProjection {
                    book_name: book.name.clone(),
                    book_price: format_price(&book.price),
                })
                .collect(),
        })
        .collect())
}

/// Up to [`OLDEST_BOOKS_LIMIT`] science books published strictly before
/// `before`, most pages first, then most recent.
pub fn oldest_science_books(
    store: &dyn Store,
    before: NaiveDate,
) -> Result<Vec<OldBookProjection>, StoreError> {
    let mut selected: Vec<Book> = store
        .books()?
        .into_iter()
        .filter(|book| book.genre == Genre::Science && book.published_on < before)
        .collect();

    selected.sort_by(|a, b| {
        b.pages
            .cmp(&a.pages)
            .then_with(|| b.published_on.cmp(&a.published_on))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    selected.truncate(OLDEST_BOOKS_LIMIT);

    Ok(selected
        .into_iter()
        .map(|book| OldBookProjection {
            date: format_short_date(book.published_on),
            book_name: book.name,
            pages: book.pages,
        })
        .collect())
}

/// [`prolific_authors`] as indented JSON.
#[tracing::instrument(name = "export_prolific_authors", skip_all)]
pub fn export_prolific_authors(store: &dyn Store) -> Result<String, ExportError> {
    let authors = prolific_authors(store)?;
    tracing::info!(authors = authors.len(), "exporting prolific authors");
    Ok(codec::encode_prolific_authors(&authors)?)
}

/// [`oldest_science_books`] as a `<Books>` XML document.
#[tracing::instrument(name = "export_oldest_science_books", skip_all, fields(before = %before))]
pub fn export_oldest_science_books(
    store: &dyn Store,
    before: NaiveDate,
) -> Result<String, ExportError> {
    let books = oldest_science_books(store, before)?;
    tracing::info!(books = books.len(), "exporting oldest science books");
    Ok(codec::encode_oldest_books(&books)?)
}

fn by_price_desc(a: &Book, b: &Book) -> Ordering {
    b.price
        .cmp(&a.price)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
