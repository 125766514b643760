//! Persisted bookshop records and the staging types that feed a commit.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned book identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for BookId {
    type Error = std::num::TryFromIntError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value).map(BookId)
    }
}

/// Store-assigned author identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u32);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of book categories, keyed by their wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Science,
    Biography,
    Business,
}

impl Genre {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Genre::Science),
            2 => Some(Genre::Biography),
            3 => Some(Genre::Business),
            _ => None,
        }
    }
}

/// A committed book together with the authors associated with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub genre: Genre,
    pub price: BigDecimal,
    pub pages: u32,
    pub published_on: NaiveDate,
    pub author_ids: Vec<AuthorId>,
}

/// A committed author together with one entry per association, in
/// association order.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub book_ids: Vec<BookId>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Join row for one author/book pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBook {
    pub author_id: AuthorId,
    pub book_id: BookId,
}

/// A validated book waiting for the next commit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub name: String,
    pub genre: Genre,
    pub price: BigDecimal,
    pub pages: u32,
    pub published_on: NaiveDate,
}

/// A validated author waiting for the next commit. `books` holds one entry
/// per association to create; repeated ids produce repeated associations.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub books: Vec<BookId>,
}

impl NewAuthor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Identities handed out by one successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub books: Vec<BookId>,
    pub authors: Vec<AuthorId>,
    pub associations: usize,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.authors.is_empty()
    }
}
