//! Manually curated form → (lemma, tag) corrections.
//!
//! Rows are tab separated. A row separated by `;` instead is a multi-candidate
//! entry, as written by the glossary exporter for ambiguous forms; it is kept
//! for review but never applied. A fourth column holds the frequency copied
//! from a glossary file and is ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use layered_conllu::{Document, Field, AMBIGUOUS_SEPARATOR, UNAMBIGUOUS_SEPARATOR};
use log::{debug, info};

use crate::{ConfidenceLevel, PostprocessError, PostprocessResult};

/// One override row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub form: String,
    pub lemma: String,
    pub tag: String,
    /// Row used the multi-candidate separator
    pub ambiguous: bool,
    /// 1-based line number in the source text
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<String, OverrideEntry>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse override rows. Any row that is not blank, not a `#` comment and
    /// does not have 3 or 4 columns fails the whole table.
    pub fn parse(text: &str) -> PostprocessResult<Self> {
        let mut table = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            table.insert(parse_row(line, idx + 1)?);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> PostprocessResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
        let table = Self::parse(&content)?;
        info!("Loaded {} overrides from {}", table.len(), path.display());
        Ok(table)
    }

    /// Merge every `.tsv` file in `dir`, in file name order.
    pub fn load_dir(dir: &Path) -> PostprocessResult<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(|e| load_error(dir, e))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "tsv"))
            .collect();
        paths.sort();

        let mut table = Self::new();
        for path in paths {
            for (_, entry) in Self::load(&path)?.entries {
                table.insert(entry);
            }
        }
        Ok(table)
    }

    /// Later rows for a form replace earlier ones.
    pub fn insert(&mut self, entry: OverrideEntry) {
        if let Some(previous) = self.entries.get(&entry.form) {
            debug!(
                "Override for \"{}\" at line {} replaces line {}",
                entry.form, entry.line, previous.line
            );
        }
        self.entries.insert(entry.form.clone(), entry);
    }

    pub fn get(&self, form: &str) -> Option<&OverrideEntry> {
        self.entries.get(form)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that would be written, ambiguous rows excluded.
    pub fn applicable(&self, form: &str) -> Option<&OverrideEntry> {
        match self.get(form) {
            Some(entry) if entry.ambiguous => {
                debug!("Skipping ambiguous override for \"{}\"", form);
                None
            }
            other => other,
        }
    }

    /// Write lemma and xpos of every unlocked token with an applicable entry
    /// and set its score to [`ConfidenceLevel::Manual`]. Returns the number of
    /// tokens overridden.
    pub fn apply(&self, doc: &mut Document) -> PostprocessResult<usize> {
        let mut lemmas = Vec::with_capacity(doc.token_count());
        let mut tags = Vec::with_capacity(doc.token_count());
        let mut scores = Vec::with_capacity(doc.token_count());
        let mut overridden = 0;

        for token in doc.tokens() {
            match self.applicable(token.get(Field::Form)) {
                Some(entry) if !token.is_locked() => {
                    lemmas.push(entry.lemma.clone());
                    tags.push(entry.tag.clone());
                    scores.push(ConfidenceLevel::Manual.as_score().to_string());
                    overridden += 1;
                }
                _ => {
                    lemmas.push(token.get(Field::Lemma).to_string());
                    tags.push(token.get(Field::Xpos).to_string());
                    scores.push(token.get(Field::Score).to_string());
                }
            }
        }

        doc.update_field(Field::Lemma, lemmas)?;
        doc.update_field(Field::Xpos, tags)?;
        doc.update_field(Field::Score, scores)?;
        info!("  + Overrides applied: {}", overridden);
        Ok(overridden)
    }
}

fn parse_row(line: &str, line_number: usize) -> PostprocessResult<OverrideEntry> {
    let ambiguous = !line.contains(UNAMBIGUOUS_SEPARATOR) && line.contains(AMBIGUOUS_SEPARATOR);
    let separator = if ambiguous {
        AMBIGUOUS_SEPARATOR
    } else {
        UNAMBIGUOUS_SEPARATOR
    };
    let columns: Vec<&str> = line.split(separator).map(str::trim).collect();

    let malformed = || PostprocessError::MalformedOverride {
        line: line_number,
        found: columns.len(),
        text: line.to_string(),
    };
    match columns.len() {
        3 => {}
        4 if columns[3].parse::<usize>().is_ok() => {}
        _ => return Err(malformed()),
    }

    Ok(OverrideEntry {
        form: columns[0].to_string(),
        lemma: columns[1].to_string(),
        tag: columns[2].to_string(),
        ambiguous,
        line: line_number,
    })
}

fn load_error(path: &Path, error: std::io::Error) -> PostprocessError {
    PostprocessError::Load {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
