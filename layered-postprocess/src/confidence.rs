//! Confidence levels and the initial scoring pass.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use layered_conllu::{has_special_marker, ConlluResult, Document, Field};
use log::info;

use crate::{PostprocessError, PostprocessResult};

/// Trust in a token's analysis, from least to most trusted.
///
/// Out-of-vocabulary forms are graded by casing: fully upper-case forms are
/// usually logograms, which the lemmatizer handles worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    /// Unseen, fully upper-case form
    Logogram,
    /// Unseen, mixed-case form
    MixedCase,
    /// Unseen, lower-case form
    LowerCase,
    /// Form present in the reference vocabulary
    InVocabulary,
    /// Manually overridden
    Manual,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 5] = [
        ConfidenceLevel::Logogram,
        ConfidenceLevel::MixedCase,
        ConfidenceLevel::LowerCase,
        ConfidenceLevel::InVocabulary,
        ConfidenceLevel::Manual,
    ];

    pub fn value(self) -> f64 {
        match self {
            ConfidenceLevel::Logogram => 0.0,
            ConfidenceLevel::MixedCase => 1.0,
            ConfidenceLevel::LowerCase => 2.0,
            ConfidenceLevel::InVocabulary => 3.0,
            ConfidenceLevel::Manual => 4.0,
        }
    }

    /// The value as written in the score column.
    pub fn as_score(self) -> &'static str {
        match self {
            ConfidenceLevel::Logogram => "0.0",
            ConfidenceLevel::MixedCase => "1.0",
            ConfidenceLevel::LowerCase => "2.0",
            ConfidenceLevel::InVocabulary => "3.0",
            ConfidenceLevel::Manual => "4.0",
        }
    }

    /// The level whose value equals `score` exactly.
    pub fn from_score(score: &str) -> Option<Self> {
        let score: f64 = score.trim().parse().ok()?;
        Self::ALL.iter().copied().find(|level| level.value() == score)
    }

    /// Level for a freshly predicted token.
    ///
    /// The lower-case test comes first, so an unseen form with no cased
    /// letters at all counts as lower-case.
    pub fn for_form(form: &str, is_oov: bool) -> Self {
        if !is_oov {
            ConfidenceLevel::InVocabulary
        } else if form.to_lowercase() == form {
            ConfidenceLevel::LowerCase
        } else if form.to_uppercase() == form {
            ConfidenceLevel::Logogram
        } else {
            ConfidenceLevel::MixedCase
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_score())
    }
}

/// Word types absent from the reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OovSet {
    types: HashSet<String>,
}

impl OovSet {
    /// One type per line; only the first tab-separated column is used.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .filter_map(|line| line.trim_end().split('\t').next())
            .filter(|form| !form.is_empty())
            .collect()
    }

    pub fn load(path: &Path) -> PostprocessResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| PostprocessError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let set = Self::from_lines(&content);
        info!("Loaded {} out-of-vocabulary types from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn contains(&self, form: &str) -> bool {
        self.types.contains(form)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OovSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Write the initial confidence level of every token into the score column.
///
/// Locked tokens are not written. Tokens marked `special=` in misc keep their
/// score, so numerals and lacunae never receive a fabricated level.
pub fn initialize_scores(doc: &mut Document, oov: &OovSet) -> ConlluResult<usize> {
    let mut counts = [0usize; 5];
    let scores: Vec<String> = doc
        .tokens()
        .map(|token| {
            if has_special_marker(token.get(Field::Misc)) {
                return token.get(Field::Score).to_string();
            }
            let form = token.get(Field::Form);
            let level = ConfidenceLevel::for_form(form, oov.contains(form));
            if !token.is_locked() {
                counts[level as usize] += 1;
            }
            level.as_score().to_string()
        })
        .collect();

    let written = doc.update_field(Field::Score, scores)?;
    info!(
        "  + Initial scores: 0.0={} 1.0={} 2.0={} 3.0={}",
        counts[0], counts[1], counts[2], counts[3]
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_rule() {
        assert_eq!(ConfidenceLevel::for_form("šarrum", true), ConfidenceLevel::LowerCase);
        assert_eq!(ConfidenceLevel::for_form("LUGAL", true), ConfidenceLevel::Logogram);
        assert_eq!(ConfidenceLevel::for_form("{d}UTU", true), ConfidenceLevel::MixedCase);
        assert_eq!(ConfidenceLevel::for_form("LUGAL", false), ConfidenceLevel::InVocabulary);
        assert_eq!(ConfidenceLevel::for_form("{d}UTU", false), ConfidenceLevel::InVocabulary);
    }

    #[test]
    fn test_caseless_form_counts_as_lower() {
        assert_eq!(ConfidenceLevel::for_form("3", true), ConfidenceLevel::LowerCase);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(ConfidenceLevel::Logogram < ConfidenceLevel::MixedCase);
        assert!(ConfidenceLevel::InVocabulary < ConfidenceLevel::Manual);
        assert_eq!(ConfidenceLevel::from_score("4.0"), Some(ConfidenceLevel::Manual));
        assert_eq!(ConfidenceLevel::from_score("4"), Some(ConfidenceLevel::Manual));
        assert_eq!(ConfidenceLevel::from_score("2.5"), None);
        assert_eq!(ConfidenceLevel::from_score("_"), None);
    }

    #[test]
    fn test_oov_set_uses_first_column() {
        let oov = OovSet::from_lines("LUGAL\t12\nšarrum\n\n{d}UTU\t3\n");
        assert_eq!(oov.len(), 3);
        assert!(oov.contains("LUGAL"));
        assert!(!oov.contains("12"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OovSet::load(&dir.path().join("types.oov")).unwrap_err();
        assert!(matches!(err, PostprocessError::Load { .. }));
    }

    #[test]
    fn test_initialize_scores() {
        let mut doc = Document::parse(
            "1\tLUGAL\tšarru\tN\tN\n\
2\tšar-ru\tšarru\tN\tN\n\
3\ta-na\tana\tPRP\tPRP\n\
4\t3\t_\tn\tn\t_\t_\t_\t_\tspecial=numeral\n\
5\tKUR\tmātu\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\tgold\n\n",
        );
        let oov: OovSet = ["LUGAL", "šar-ru", "3", "KUR"].into_iter().collect();
        let written = initialize_scores(&mut doc, &oov).unwrap();
        assert_eq!(written, 4);

        let scores: Vec<_> = doc.field_values(Field::Score).collect();
        assert_eq!(scores, vec!["0.0", "2.0", "3.0", "_", "_"]);
    }
}
