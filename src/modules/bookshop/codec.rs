//! Document codecs: XML for books, JSON for authors.

use quick_xml::{de::DeError, events::Event, se::SeError, Reader};
use serde::Serialize;
use thiserror::Error;

use super::models::{
    AuthorCandidate, AuthorProjection, BookCandidate, BooksDocument, OldBookProjection,
    OldBooksDocument,
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const BOOKS_ROOT: &str = "Books";

/// A document that could not be read or written at the syntax level.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed XML document: {0}")]
    Xml(#[from] DeError),

    #[error("malformed XML document: {0}")]
    XmlSyntax(#[from] quick_xml::Error),

    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("failed to write XML document: {0}")]
    XmlWrite(#[from] SeError),

    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read the `<Books>` import document.
///
/// Elements other than `<Book>` inside the root are ignored.
pub fn decode_books(xml: &str) -> Result<Vec<BookCandidate>, CodecError> {
    expect_root(xml, BOOKS_ROOT)?;
    let document: BooksDocument = quick_xml::de::from_str(xml)?;
    Ok(document.books)
}

/// Read the authors import array.
pub fn decode_authors(json: &str) -> Result<Vec<AuthorCandidate>, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Two-space indented JSON array.
pub fn encode_prolific_authors(authors: &[AuthorProjection]) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(authors)?)
}

/// `<Books>` document with one `<Book>` per projection.
pub fn encode_oldest_books(books: &[OldBookProjection]) -> Result<String, CodecError> {
    encode_xml(BOOKS_ROOT, &OldBooksDocument { books })
}

/// Check the name of the first element; an empty document is left to the
/// deserializer to reject.
fn expect_root(xml: &str, expected: &'static str) -> Result<(), CodecError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let name = element.local_name();
                if name.as_ref() == expected.as_bytes() {
                    return Ok(());
                }
                return Err(CodecError::UnexpectedRoot {
                    expected,
                    found: String::from_utf8_lossy(name.as_ref()).into_owned(),
                });
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn encode_xml<T: Serialize>(root: &str, value: &T) -> Result<String, CodecError> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::with_root(&mut body, Some(root))?;
    serializer.indent(' ', 2);
    value.serialize(serializer)?;

    Ok(format!("{}\n{}", XML_DECLARATION, body.trim_end()))
}
