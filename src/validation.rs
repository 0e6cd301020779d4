//! Recoverable findings collected while parsing.
//!
//! Validation never aborts a parse. Findings are grouped by category and
//! surfaced as one summary at the end of the pass.

use std::fmt;

use crate::special::has_lacuna_sign;
use crate::{Field, TokenRecord, PLACEHOLDER};

/// Tag values that count as "no tag".
const MISSING_TAGS: [&str; 4] = [PLACEHOLDER, "X", "x", "u"];

/// Kind of validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationCategory {
    /// Id is not a plain integer (multi-word range or empty node)
    NonIntegerId,
    LemmaMissing,
    TagMissing,
    WildcardInForm,
    /// Line had more columns than the table defines
    ExtraColumns,
}

impl ValidationCategory {
    pub const ALL: [ValidationCategory; 5] = [
        ValidationCategory::NonIntegerId,
        ValidationCategory::LemmaMissing,
        ValidationCategory::TagMissing,
        ValidationCategory::WildcardInForm,
        ValidationCategory::ExtraColumns,
    ];

    pub fn description(self) -> &'static str {
        match self {
            ValidationCategory::NonIntegerId => "Expected exactly one word per line",
            ValidationCategory::LemmaMissing => "Lemma missing for non-lacuna",
            ValidationCategory::TagMissing => "XPOS missing for non-lacuna",
            ValidationCategory::WildcardInForm => "Wildcard in form",
            ValidationCategory::ExtraColumns => "Extra columns truncated",
        }
    }
}

/// A single finding, tied to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub category: ValidationCategory,
    pub line: usize,
    /// `form <> lemma <> xpos`
    pub identifier: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06} | {}", self.line, self.identifier)
    }
}

/// Check a freshly parsed record. Returns at most one content finding per
/// line, checked in a fixed order.
pub(crate) fn validate_record(record: &TokenRecord, line: usize) -> Option<ValidationWarning> {
    let form = record.get(Field::Form);
    let warn = |category| {
        Some(ValidationWarning {
            category,
            line,
            identifier: record.identifier(),
        })
    };

    let id = record.get(Field::Id);
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return warn(ValidationCategory::NonIntegerId);
    }
    if record.is_unset(Field::Lemma) {
        return if has_lacuna_sign(form) {
            None
        } else {
            warn(ValidationCategory::LemmaMissing)
        };
    }
    if MISSING_TAGS.contains(&record.get(Field::Xpos)) {
        return if has_lacuna_sign(form) {
            None
        } else {
            warn(ValidationCategory::TagMissing)
        };
    }
    if form.contains('*') {
        return warn(ValidationCategory::WildcardInForm);
    }
    None
}

/// Findings accumulated over one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub warnings: Vec<ValidationWarning>,
}

impl ParseReport {
    pub fn push(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn count(&self, category: ValidationCategory) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.category == category)
            .count()
    }

    /// Non-empty categories in fixed order, each with its findings in line order.
    pub fn by_category(&self) -> Vec<(ValidationCategory, Vec<&ValidationWarning>)> {
        ValidationCategory::ALL
            .iter()
            .filter_map(|&category| {
                let found: Vec<_> = self
                    .warnings
                    .iter()
                    .filter(|w| w.category == category)
                    .collect();
                if found.is_empty() {
                    None
                } else {
                    Some((category, found))
                }
            })
            .collect()
    }

    /// Aggregate report, one block per category.
    pub fn summary(&self) -> String {
        let mut out = String::from("WARNINGS\n");
        for (category, warnings) in self.by_category() {
            out.push_str(category.description());
            out.push_str(":\n");
            for warning in warnings {
                out.push_str("   ");
                out.push_str(&warning.to_string());
                out.push('\n');
            }
        }
        out
    }
}
