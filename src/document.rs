//! The extended CoNLL-U document.
//!
//! A [`Document`] owns an ordered list of [`AnnotationUnit`]s. Every stage of
//! the annotation pipeline reads it through [`Document::field_values`] or
//! [`Document::context`] and writes it through one of the lock-respecting
//! mutators: [`Document::update_field`], [`Document::apply_dictionary`],
//! [`Document::force_field`], [`Document::normalize`] and
//! [`Document::unlemmatize_special`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::context::{self, ContextWindow};
use crate::special::{has_special_marker, SpecialCategory};
use crate::validation::validate_record;
use crate::{
    AnnotationUnit, ConlluError, ConlluResult, Field, Normalizer, ParseReport, TokenRecord,
    ValidationCategory, ValidationWarning, PLACEHOLDER,
};

/// Prefix of comment lines.
pub const COMMENT_MARKER: char = '#';

/// Prefix of document-level header comments.
pub const GLOBAL_PREFIX: &str = "# global.";

/// Options controlling a parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Collect validation findings for every data line
    pub validate: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// A parsed document together with the findings collected along the way.
#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    pub report: ParseReport,
}

/// Count of a single value in one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFrequency {
    pub count: usize,
    /// Share of all tokens, in percent, rounded to three decimals
    pub percent: f64,
    pub value: String,
}

/// An extended CoNLL-U document held entirely in memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// `# global.*` lines written before the first unit
    header: Vec<String>,
    units: Vec<AnnotationUnit>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("header_lines", &self.header.len())
            .field("unit_count", &self.units.len())
            .field("token_count", &self.token_count())
            .finish()
    }
}

impl Document {
    pub fn from_units(units: Vec<AnnotationUnit>) -> Self {
        Self {
            header: Vec::new(),
            units,
        }
    }

    /// Parse tabular text, collecting validation findings without halting.
    ///
    /// - `#` lines before a unit's first token are its comments; `# global.`
    ///   lines seen before anything else form the document header instead
    /// - `#` lines between tokens keep their position within the unit
    /// - every blank line closes a unit (consecutive blank lines give empty units)
    /// - data lines are tab-split and padded with placeholders
    pub fn parse_with(source: &str, options: ParseOptions) -> ParseResult {
        let mut header = Vec::new();
        let mut units = Vec::new();
        let mut unit = AnnotationUnit::default();
        let mut report = ParseReport::default();

        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;

            if line.starts_with(COMMENT_MARKER) {
                let at_document_start = units.is_empty() && unit == AnnotationUnit::default();
                if at_document_start && line.starts_with(GLOBAL_PREFIX) {
                    header.push(line.to_string());
                } else if unit.tokens.is_empty() {
                    unit.comments.push(line.to_string());
                } else {
                    unit.inline_comments.push((unit.tokens.len(), line.to_string()));
                }
            } else if line.trim().is_empty() {
                units.push(std::mem::take(&mut unit));
            } else {
                let (record, dropped) = TokenRecord::from_line(line);
                if options.validate {
                    if dropped > 0 {
                        report.push(ValidationWarning {
                            category: ValidationCategory::ExtraColumns,
                            line: line_number,
                            identifier: record.identifier(),
                        });
                    }
                    if let Some(warning) = validate_record(&record, line_number) {
                        report.push(warning);
                    }
                }
                unit.tokens.push(record);
            }
        }

        if unit != AnnotationUnit::default() {
            units.push(unit);
        }

        if !report.is_clean() {
            warn!("{} validation warnings\n{}", report.len(), report.summary());
        }

        ParseResult {
            document: Document { header, units },
            report,
        }
    }

    /// Parse with validation, logging findings and discarding the report.
    pub fn parse(source: &str) -> Self {
        Self::parse_with(source, ParseOptions::default()).document
    }

    /// Read and parse a file.
    pub fn read(path: impl AsRef<Path>, options: ParseOptions) -> ConlluResult<ParseResult> {
        let path = path.as_ref();
        info!("Parsing {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| ConlluError::io(path, e))?;
        Ok(Self::parse_with(&source, options))
    }

    /// Render the document: header lines, then each unit's comments and token
    /// lines followed by one blank separator line.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for unit in &self.units {
            for comment in &unit.comments {
                out.push_str(comment);
                out.push('\n');
            }
            for (idx, token) in unit.tokens.iter().enumerate() {
                for comment in unit.comments_before(idx) {
                    out.push_str(comment);
                    out.push('\n');
                }
                out.push_str(&token.to_line());
                out.push('\n');
            }
            for comment in unit.comments_before(unit.tokens.len()) {
                out.push_str(comment);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Serialize and write to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> ConlluResult<()> {
        let path = path.as_ref();
        info!("Writing {}", path.display());
        fs::write(path, self.serialize()).map_err(|e| ConlluError::io(path, e))
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Replace the header with the standard info and column lines.
    pub fn with_generated_header(mut self) -> Self {
        self.set_generated_header();
        self
    }

    pub fn set_generated_header(&mut self) {
        let columns: Vec<_> = Field::ALL.iter().map(|field| field.name()).collect();
        self.header = vec![
            format!(
                "{}info = generated with {} {}",
                GLOBAL_PREFIX,
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            format!("{}columns = {}", GLOBAL_PREFIX, columns.join(" ")),
        ];
    }

    pub fn units(&self) -> &[AnnotationUnit] {
        &self.units
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn token_count(&self) -> usize {
        self.units.iter().map(AnnotationUnit::len).sum()
    }

    /// All token records in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &TokenRecord> + '_ {
        self.units.iter().flat_map(|unit| unit.tokens.iter())
    }

    pub(crate) fn tokens_mut(&mut self) -> impl Iterator<Item = &mut TokenRecord> + '_ {
        self.units.iter_mut().flat_map(|unit| unit.tokens.iter_mut())
    }

    /// Unlocked token records in document order.
    pub(crate) fn unlocked_mut(&mut self) -> impl Iterator<Item = &mut TokenRecord> + '_ {
        self.tokens_mut().filter(|token| !token.is_locked())
    }

    /// One column's values, one per token, in document order.
    pub fn field_values(&self, field: Field) -> impl Iterator<Item = &str> + '_ {
        self.tokens().map(move |token| token.get(field))
    }

    /// Several columns at once, one array per token, in document order.
    pub fn field_tuples<const N: usize>(
        &self,
        fields: [Field; N],
    ) -> impl Iterator<Item = [&str; N]> + '_ {
        self.tokens()
            .map(move |token| fields.map(|field| token.get(field)))
    }

    /// Context windows of `field` with `half_window` neighbours on each side,
    /// one per token, in document order, never crossing a unit boundary.
    ///
    /// The iterator borrows the document, so it must be collected before the
    /// windows are written back with [`Document::update_field`].
    pub fn context(
        &self,
        field: Field,
        half_window: usize,
    ) -> impl Iterator<Item = ContextWindow<'_>> + '_ {
        self.units
            .iter()
            .flat_map(move |unit| context::windows(unit.values(field), half_window))
    }

    /// Recompute the stored context column for `anchor`.
    ///
    /// Writes into `target` with the same lock rules as `update_field`.
    pub fn refresh_context(
        &mut self,
        anchor: Field,
        target: Field,
        half_window: usize,
    ) -> ConlluResult<usize> {
        info!("Fetching contexts for \"{}\"", anchor);
        let windows: Vec<String> = self
            .context(anchor, half_window)
            .map(|window| window.joined())
            .collect();
        self.update_field(target, windows)
    }

    /// Write a positionally aligned sequence of values into `field`.
    ///
    /// Every token consumes one value, but locked tokens keep their column.
    /// Fails without touching the document if `values` yields fewer elements
    /// than there are tokens. Returns the number of tokens written.
    pub fn update_field<I, S>(&mut self, field: Field, values: I) -> ConlluResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        info!("Updating field \"{}\"", field);
        let expected = self.token_count();
        let mut values = values.into_iter();
        let mut aligned = Vec::with_capacity(expected);
        for _ in 0..expected {
            match values.next() {
                Some(value) => aligned.push(value.into()),
                None => {
                    return Err(ConlluError::ExhaustedInput {
                        field,
                        expected,
                        received: aligned.len(),
                    })
                }
            }
        }
        if values.next().is_some() {
            warn!(
                "Update of \"{}\" received more values than the {} tokens; surplus ignored",
                field, expected
            );
        }

        let mut written = 0;
        for (token, value) in self.tokens_mut().zip(aligned) {
            if !token.is_locked() {
                token.set(field, value);
                written += 1;
            }
        }
        Ok(written)
    }

    /// Overwrite `field` with `value` on every unlocked token.
    pub fn force_field(&mut self, field: Field, value: &str) -> usize {
        info!("Forcing field \"{}\" to \"{}\"", field, value);
        let mut written = 0;
        for token in self.unlocked_mut() {
            token.set(field, value);
            written += 1;
        }
        written
    }

    /// Canonicalize form and lemma of unlocked tokens. Returns how many
    /// tokens changed.
    pub fn normalize<N: Normalizer + ?Sized>(&mut self, normalizer: &N) -> usize {
        info!("Normalizing forms and lemmata");
        let mut changed = 0;
        for token in self.unlocked_mut() {
            let mut touched = false;
            for field in [Field::Form, Field::Lemma] {
                if token.is_unset(field) {
                    continue;
                }
                let normalized = normalizer.normalize(token.get(field));
                if normalized != token.get(field) {
                    token.set(field, normalized);
                    touched = true;
                }
            }
            if touched {
                changed += 1;
            }
        }
        changed
    }

    /// Mark numerals and lacunae as structurally determined.
    ///
    /// For each unlocked token whose form falls in one of `categories`: the
    /// lemma is blanked, the tag forced to the category sentinel, the category
    /// recorded in misc and the score cleared.
    pub fn unlemmatize_special(&mut self, categories: &[SpecialCategory]) -> usize {
        let mut marked = 0;
        for token in self.unlocked_mut() {
            let category = match SpecialCategory::classify(token.get(Field::Form)) {
                Some(category) if categories.contains(&category) => category,
                _ => continue,
            };

            token.set(Field::Lemma, PLACEHOLDER);
            token.set(Field::Xpos, category.tag_sentinel());
            token.set(Field::Score, PLACEHOLDER);

            let misc = token.get(Field::Misc);
            if misc == PLACEHOLDER || misc.is_empty() {
                token.set(Field::Misc, category.misc_entry());
            } else if !has_special_marker(misc) {
                let misc = format!("{}|{}", misc, category.misc_entry());
                token.set(Field::Misc, misc);
            }
            marked += 1;
        }
        info!("Marked {} numerals and lacunae", marked);
        marked
    }

    /// Frequency of each value of `field`, most frequent first; ties keep
    /// first-seen order.
    pub fn word_freqs(&self, field: Field) -> Vec<FieldFrequency> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for value in self.field_values(field) {
            match index.get(value) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(value, counts.len());
                    counts.push((value, 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = self.token_count().max(1) as f64;
        counts
            .into_iter()
            .map(|(value, count)| FieldFrequency {
                count,
                percent: (100_000.0 * count as f64 / total).round() / 1000.0,
                value: value.to_string(),
            })
            .collect()
    }
}
