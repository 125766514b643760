//! Batch import pipelines.
//!
//! Both pipelines decode a whole document, judge each record on its own,
//! stage the accepted ones and commit exactly once at the end. A rejected
//! record never blocks the others; a failed commit fails the whole call.

use std::collections::HashSet;

use bookshop_db::{Store, StoreError};
use thiserror::Error;

use super::codec::{self, CodecError};
use super::report::{ImportReport, Rejection, ReportLine};
use super::resolver::resolve_books;
use super::validation::{validate_author, validate_book};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] CodecError),

    #[error("import was not committed: {0}")]
    Store(#[from] StoreError),
}

/// Import a `<Books>` document.
#[tracing::instrument(name = "import_books", skip_all, fields(bytes = xml.len()))]
pub fn import_books(store: &mut dyn Store, xml: &str) -> Result<ImportReport, ImportError> {
    let candidates = codec::decode_books(xml)?;
    let mut report = ImportReport::default();
    let mut accepted = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        match validate_book(candidate) {
            Ok(book) => {
                report.push(ReportLine::ImportedBook {
                    name: book.name.clone(),
                    price: book.price.clone(),
                });
                accepted.push(book);
            }
            Err(violations) => {
                let rejection = Rejection::Violations(violations);
                tracing::debug!(index, reason = %rejection, "book rejected");
                report.push(ReportLine::Rejected(rejection));
            }
        }
    }

    store.stage_books(accepted);
    commit(store, &report)?;

    Ok(report)
}

/// Import an authors JSON array, linking each author to existing books.
#[tracing::instrument(name = "import_authors", skip_all, fields(bytes = json.len()))]
pub fn import_authors(store: &mut dyn Store, json: &str) -> Result<ImportReport, ImportError> {
    let candidates = codec::decode_authors(json)?;
    let mut report = ImportReport::default();
    let mut accepted = Vec::new();
    let mut emails: HashSet<String> = HashSet::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let mut author = match validate_author(candidate) {
            Ok(author) => author,
            Err(violations) => {
                let rejection = Rejection::Violations(violations);
                tracing::debug!(index, reason = %rejection, "author rejected");
                report.push(ReportLine::Rejected(rejection));
                continue;
            }
        };

        if emails.contains(&author.email) {
            tracing::debug!(index, email = %author.email, "author rejected: email already imported");
            report.push(ReportLine::Rejected(Rejection::DuplicateEmail(author.email)));
            continue;
        }

        author.books = resolve_books(&*store, &candidate.books)?;
        if author.books.is_empty() {
            tracing::debug!(index, "author rejected: no referenced book exists");
            report.push(ReportLine::Rejected(Rejection::NoBooks));
            continue;
        }

        report.push(ReportLine::ImportedAuthor {
            full_name: author.full_name(),
            books: author.books.len(),
        });
        emails.insert(author.email.clone());
        accepted.push(author);
    }

    store.stage_authors(accepted);
    commit(store, &report)?;

    Ok(report)
}

fn commit(store: &mut dyn Store, report: &ImportReport) -> Result<(), ImportError> {
    match store.commit() {
        Ok(summary) if summary.is_empty() => {
            tracing::info!(
                records = report.len(),
                rejected = report.rejected(),
                "import had nothing to commit"
            );
            Ok(())
        }
        Ok(summary) => {
            tracing::info!(
                records = report.len(),
                imported = report.imported(),
                rejected = report.rejected(),
                new_books = summary.books.len(),
                new_authors = summary.authors.len(),
                "import committed"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                records = report.len(),
                "import commit failed; batch discarded"
            );
            Err(err.into())
        }
    }
}
