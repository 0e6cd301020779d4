//! Token records and the annotation units that own them.

use crate::{Field, FIELD_COUNT, PLACEHOLDER};

/// One token line: a fixed array of column values.
///
/// When [`Field::Lock`] holds anything other than the placeholder, no
/// automated stage may modify any column of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    fields: [String; FIELD_COUNT],
}

impl Default for TokenRecord {
    fn default() -> Self {
        Self {
            fields: std::array::from_fn(|_| PLACEHOLDER.to_string()),
        }
    }
}

impl TokenRecord {
    /// Build a record from tab-split columns.
    ///
    /// Missing trailing columns are filled with the placeholder. Columns past
    /// [`FIELD_COUNT`] are dropped; the second value is how many were dropped.
    pub fn from_columns<'a, I>(columns: I) -> (Self, usize)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = Self::default();
        let mut dropped = 0;
        for (idx, column) in columns.into_iter().enumerate() {
            if idx < FIELD_COUNT {
                record.fields[idx] = column.to_string();
            } else {
                dropped += 1;
            }
        }
        (record, dropped)
    }

    /// Parse a single tab-separated data line.
    pub fn from_line(line: &str) -> (Self, usize) {
        Self::from_columns(line.split('\t'))
    }

    /// Builder-style setter, handy for constructing records in code.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields[field.index()] = value.into();
        self
    }

    pub fn get(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    /// Overwrite a column. Lock checks are the caller's job; the document
    /// mutators all perform them.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields[field.index()] = value.into();
    }

    pub fn is_locked(&self) -> bool {
        self.get(Field::Lock) != PLACEHOLDER
    }

    /// True when the column holds the placeholder.
    pub fn is_unset(&self, field: Field) -> bool {
        self.get(field) == PLACEHOLDER
    }

    /// Running score parsed as a number, if it is one.
    pub fn score(&self) -> Option<f64> {
        self.get(Field::Score)
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
    }

    pub fn columns(&self) -> &[String; FIELD_COUNT] {
        &self.fields
    }

    /// Tab-joined line as written to disk.
    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }

    /// `form <> lemma <> xpos` triple used in diagnostics.
    pub fn identifier(&self) -> String {
        format!(
            "{} <> {} <> {}",
            self.get(Field::Form),
            self.get(Field::Lemma),
            self.get(Field::Xpos)
        )
    }
}

/// A sentence-like unit: leading comments plus its token records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationUnit {
    /// Comment lines (with their `#`) before the first token, passed through unchanged
    pub comments: Vec<String>,
    pub tokens: Vec<TokenRecord>,
    /// Comment lines after the first token, keyed by the index of the token
    /// they precede (`tokens.len()` when they follow the last one)
    pub inline_comments: Vec<(usize, String)>,
}

impl AnnotationUnit {
    pub fn new(tokens: Vec<TokenRecord>) -> Self {
        Self {
            comments: Vec::new(),
            tokens,
            inline_comments: Vec::new(),
        }
    }

    /// Comment lines placed directly before token `index`.
    pub fn comments_before(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.inline_comments
            .iter()
            .filter(move |(position, _)| *position == index)
            .map(|(_, comment)| comment.as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Values of one column in token order.
    pub fn values(&self, field: Field) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(move |token| token.get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_is_padded() {
        let (record, dropped) = TokenRecord::from_line("1\ta-na\tana\tPRP\tPRP");
        assert_eq!(dropped, 0);
        assert_eq!(record.get(Field::Form), "a-na");
        assert_eq!(record.get(Field::Xpos), "PRP");
        assert_eq!(record.get(Field::Feats), PLACEHOLDER);
        assert_eq!(record.get(Field::Lock), PLACEHOLDER);
        assert!(!record.is_locked());
    }

    #[test]
    fn test_long_line_is_truncated() {
        let line = vec!["x"; FIELD_COUNT + 2].join("\t");
        let (record, dropped) = TokenRecord::from_line(&line);
        assert_eq!(dropped, 2);
        assert_eq!(record.to_line(), vec!["x"; FIELD_COUNT].join("\t"));
    }

    #[test]
    fn test_lock_and_score() {
        let record = TokenRecord::default()
            .with(Field::Score, "3.0")
            .with(Field::Lock, "manual");
        assert!(record.is_locked());
        assert_eq!(record.score(), Some(3.0));

        let unscored = TokenRecord::default();
        assert_eq!(unscored.score(), None);
        assert!(unscored.is_unset(Field::Score));
    }

    #[test]
    fn test_identifier() {
        let record = TokenRecord::default()
            .with(Field::Form, "LUGAL")
            .with(Field::Lemma, "šarru")
            .with(Field::Xpos, "N");
        assert_eq!(record.identifier(), "LUGAL <> šarru <> N");
    }
}
