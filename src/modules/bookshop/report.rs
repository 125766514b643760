//! Per-record outcome report for an import call.

use std::fmt;

use bigdecimal::BigDecimal;

use super::validation::RuleViolation;
use crate::utils::format_price;

/// Fixed line for any rejected record.
pub const INVALID_DATA: &str = "Invalid data!";

/// Why a record was not imported.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Violations(Vec<RuleViolation>),
    /// Email already taken by an earlier author of the same batch.
    DuplicateEmail(String),
    /// None of the referenced books exist.
    NoBooks,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Violations(violations) => {
                let joined: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join("; "))
            }
            Rejection::DuplicateEmail(email) => write!(f, "duplicate email {}", email),
            Rejection::NoBooks => f.write_str("no referenced book exists"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Rejected(Rejection),
    ImportedBook { name: String, price: BigDecimal },
    ImportedAuthor { full_name: String, books: usize },
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Rejected(_) => f.write_str(INVALID_DATA),
            ReportLine::ImportedBook { name, price } => write!(
                f,
                "Successfully imported book {} for {}.",
                name,
                format_price(price)
            ),
            ReportLine::ImportedAuthor { full_name, books } => write!(
                f,
                "Successfully imported author - {} with {} books.",
                full_name, books
            ),
        }
    }
}

/// One line per processed candidate, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    lines: Vec<ReportLine>,
}

impl ImportReport {
    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn imported(&self) -> usize {
        self.lines.len() - self.rejected()
    }

    pub fn rejected(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, ReportLine::Rejected(_)))
            .count()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.lines.iter().map(ToString::to_string).collect();
        f.write_str(rendered.join("\n").trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn lines_render_fixed_messages() {
        let book = ReportLine::ImportedBook {
            name: "Dune".to_string(),
            price: BigDecimal::from_str("15.5").unwrap(),
        };
        let author = ReportLine::ImportedAuthor {
            full_name: "Frank Herbert".to_string(),
            books: 2,
        };
        let rejected = ReportLine::Rejected(Rejection::NoBooks);

        assert_eq!(book.to_string(), "Successfully imported book Dune for 15.50.");
        assert_eq!(
            author.to_string(),
            "Successfully imported author - Frank Herbert with 2 books."
        );
        assert_eq!(rejected.to_string(), "Invalid data!");
    }

    #[test]
    fn report_joins_lines_without_trailing_newline() {
        let mut report = ImportReport::default();
        report.push(ReportLine::Rejected(Rejection::DuplicateEmail(
            "a@b.c".to_string(),
        )));
        report.push(ReportLine::ImportedAuthor {
            full_name: "Frank Herbert".to_string(),
            books: 1,
        });

        assert_eq!(
            report.to_string(),
            "Invalid data!\nSuccessfully imported author - Frank Herbert with 1 books."
        );
        assert_eq!(report.imported(), 1);
        assert_eq!(report.rejected(), 1);
    }

    #[test]
    fn empty_report_renders_empty() {
        let report = ImportReport::default();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn rejection_reasons_are_kept_for_logging() {
        let rejection = Rejection::Violations(vec![RuleViolation {
            field: "Phone",
            rule: "format",
            message: "'123' is not ###-###-####".to_string(),
        }]);
        assert_eq!(
            rejection.to_string(),
            "Phone [format]: '123' is not ###-###-####"
        );
    }
}
