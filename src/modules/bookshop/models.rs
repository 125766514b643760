//! Wire shapes for the bookshop documents.
//!
//! Candidates keep every scalar as optional raw text so that a bad value is
//! a validation failure for that record only, not a decode failure for the
//! whole document.

use serde::{Deserialize, Serialize};

/// One `<Book>` element of an import document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookCandidate {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<String>,
    #[serde(rename = "Pages", default)]
    pub pages: Option<String>,
    #[serde(rename = "PublishedOn", default)]
    pub published_on: Option<String>,
}

/// Root of the books import document.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BooksDocument {
    #[serde(rename = "Book", default)]
    pub books: Vec<BookCandidate>,
}

/// `{ "Id": n }` entry of an author's book list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BookReference {
    #[serde(rename = "Id", alias = "id", default)]
    pub id: Option<i64>,
}

/// One object of the authors import array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorCandidate {
    #[serde(alias = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(alias = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(alias = "email", default)]
    pub email: Option<String>,
    #[serde(alias = "phone", default)]
    pub phone: Option<String>,
    #[serde(alias = "books", default)]
    pub books: Vec<BookReference>,
}

/// Entry of the prolific authors export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorProjection {
    pub author_name: String,
    pub books: Vec<AuthorBookProjection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorBookProjection {
    pub book_name: String,
    /// Price with exactly two decimals.
    pub book_price: String,
}

/// Entry of the oldest science books export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OldBookProjection {
    pub book_name: String,
    /// `MM/dd/yyyy`
    pub date: String,
    pub pages: u32,
}

/// Root of the oldest science books export document.
#[derive(Debug, Serialize)]
pub(crate) struct OldBooksDocument<'a> {
    #[serde(rename = "Book")]
    pub books: &'a [OldBookProjection],
}
