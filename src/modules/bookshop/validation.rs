//! Field rules for import candidates.
//!
//! Each entity kind has a fixed rule table. Every rule is evaluated, so a
//! rejected record carries the complete list of what was wrong with it.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use bookshop_db::{Genre, NewAuthor, NewBook};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{AuthorCandidate, BookCandidate};
use crate::utils::SHORT_DATE_FORMAT;

const NAME_LENGTH: (usize, usize) = (3, 30);
const PAGES_RANGE: (i64, i64) = (50, 5000);
const MAX_PRICE_UNITS: u128 = 79_228_162_514_264_337_593_543_950_335;

static MIN_PRICE: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::new(BigInt::from(1), 2));
static MAX_PRICE: Lazy<BigDecimal> =
    Lazy::new(|| BigDecimal::new(BigInt::from(MAX_PRICE_UNITS), 0));
static SHORT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("short date regex is valid"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email regex is valid"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("phone regex is valid"));

/// One failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.rule, self.message)
    }
}

struct Rule<T> {
    field: &'static str,
    rule: &'static str,
    check: fn(&T) -> Result<(), String>,
}

const BOOK_RULES: &[Rule<BookCandidate>] = &[
    Rule {
        field: "Name",
        rule: "length",
        check: check_book_name,
    },
    Rule {
        field: "Genre",
        rule: "enum",
        check: check_genre,
    },
    Rule {
        field: "Price",
        rule: "range",
        check: check_price,
    },
    Rule {
        field: "Pages",
        rule: "range",
        check: check_pages,
    },
    Rule {
        field: "PublishedOn",
        rule: "date",
        check: check_published_on,
    },
];

const AUTHOR_RULES: &[Rule<AuthorCandidate>] = &[
    Rule {
        field: "FirstName",
        rule: "length",
        check: check_first_name,
    },
    Rule {
        field: "LastName",
        rule: "length",
        check: check_last_name,
    },
    Rule {
        field: "Email",
        rule: "format",
        check: check_email,
    },
    Rule {
        field: "Phone",
        rule: "format",
        check: check_phone,
    },
];

fn check_book_name(book: &BookCandidate) -> Result<(), String> {
    text_length(book.name.as_deref(), NAME_LENGTH).map(drop)
}

fn check_genre(book: &BookCandidate) -> Result<(), String> {
    genre(book.genre.as_deref()).map(drop)
}

fn check_price(book: &BookCandidate) -> Result<(), String> {
    price(book.price.as_deref()).map(drop)
}

fn check_pages(book: &BookCandidate) -> Result<(), String> {
    pages(book.pages.as_deref()).map(drop)
}

fn check_published_on(book: &BookCandidate) -> Result<(), String> {
    short_date(book.published_on.as_deref()).map(drop)
}

fn check_first_name(author: &AuthorCandidate) -> Result<(), String> {
    text_length(author.first_name.as_deref(), NAME_LENGTH).map(drop)
}

fn check_last_name(author: &AuthorCandidate) -> Result<(), String> {
    text_length(author.last_name.as_deref(), NAME_LENGTH).map(drop)
}

fn check_email(author: &AuthorCandidate) -> Result<(), String> {
    pattern(author.email.as_deref(), &EMAIL, "an email address").map(drop)
}

fn check_phone(author: &AuthorCandidate) -> Result<(), String> {
    pattern(author.phone.as_deref(), &PHONE, "###-###-####").map(drop)
}

fn evaluate<T>(rules: &[Rule<T>], candidate: &T) -> Vec<RuleViolation> {
    rules
        .iter()
        .filter_map(|rule| {
            (rule.check)(candidate)
                .err()
                .map(|message| RuleViolation {
                    field: rule.field,
                    rule: rule.rule,
                    message,
                })
        })
        .collect()
}

/// Check a book candidate and, if every rule passes, convert it to its
/// native representation.
pub fn validate_book(candidate: &BookCandidate) -> Result<NewBook, Vec<RuleViolation>> {
    let violations = evaluate(BOOK_RULES, candidate);
    if !violations.is_empty() {
        return Err(violations);
    }

    to_new_book(candidate).map_err(|message| vec![conversion_failure("Book", message)])
}

/// Check an author candidate. The returned author has no books yet; those
/// come from reference resolution.
pub fn validate_author(candidate: &AuthorCandidate) -> Result<NewAuthor, Vec<RuleViolation>> {
    let violations = evaluate(AUTHOR_RULES, candidate);
    if !violations.is_empty() {
        return Err(violations);
    }

    to_new_author(candidate).map_err(|message| vec![conversion_failure("Author", message)])
}

fn to_new_book(candidate: &BookCandidate) -> Result<NewBook, String> {
    Ok(NewBook {
        name: text_length(candidate.name.as_deref(), NAME_LENGTH)?.to_string(),
        genre: genre(candidate.genre.as_deref())?,
        price: price(candidate.price.as_deref())?,
        pages: pages(candidate.pages.as_deref())?,
        published_on: short_date(candidate.published_on.as_deref())?,
    })
}

fn to_new_author(candidate: &AuthorCandidate) -> Result<NewAuthor, String> {
    Ok(NewAuthor {
        first_name: text_length(candidate.first_name.as_deref(), NAME_LENGTH)?.to_string(),
        last_name: text_length(candidate.last_name.as_deref(), NAME_LENGTH)?.to_string(),
        email: pattern(candidate.email.as_deref(), &EMAIL, "an email address")?.to_string(),
        phone: pattern(candidate.phone.as_deref(), &PHONE, "###-###-####")?.to_string(),
        books: Vec::new(),
    })
}

fn conversion_failure(field: &'static str, message: String) -> RuleViolation {
    RuleViolation {
        field,
        rule: "conversion",
        message,
    }
}

fn required(value: Option<&str>) -> Result<&str, String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err("is required".to_string()),
    }
}

fn text_length(value: Option<&str>, (min, max): (usize, usize)) -> Result<&str, String> {
    let text = required(value)?;
    let length = text.chars().count();
    if (min..=max).contains(&length) {
        Ok(text)
    } else {
        Err(format!(
            "must be {} to {} characters long, got {}",
            min, max, length
        ))
    }
}

fn integer(value: Option<&str>) -> Result<i64, String> {
    let text = required(value)?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a whole number", text))
}

fn genre(value: Option<&str>) -> Result<Genre, String> {
    let code = integer(value)?;
    Genre::from_code(code).ok_or_else(|| format!("unknown genre code {}", code))
}

fn pages(value: Option<&str>) -> Result<u32, String> {
    let (min, max) = PAGES_RANGE;
    let count = integer(value)?;
    if !(min..=max).contains(&count) {
        return Err(format!("must be between {} and {}, got {}", min, max, count));
    }
    u32::try_from(count).map_err(|err| err.to_string())
}

fn price(value: Option<&str>) -> Result<BigDecimal, String> {
    let text = required(value)?;
    let amount = BigDecimal::from_str(text.trim())
        .map_err(|_| format!("'{}' is not a decimal number", text))?;
    if amount < *MIN_PRICE || amount > *MAX_PRICE {
        return Err(format!(
            "must be between {} and {}, got {}",
            *MIN_PRICE, *MAX_PRICE, amount
        ));
    }
    Ok(amount)
}

fn short_date(value: Option<&str>) -> Result<NaiveDate, String> {
    let text = required(value)?;
    if !SHORT_DATE.is_match(text) {
        return Err(format!("'{}' does not match MM/dd/yyyy", text));
    }
    NaiveDate::parse_from_str(text, SHORT_DATE_FORMAT)
        .map_err(|_| format!("'{}' is not a calendar date", text))
}

fn pattern<'a>(value: Option<&'a str>, regex: &Regex, shape: &str) -> Result<&'a str, String> {
    let text = required(value)?;
    if regex.is_match(text) {
        Ok(text)
    } else {
        Err(format!("'{}' is not {}", text, shape))
    }
}
