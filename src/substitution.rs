//! Conditional substitution of token fields from a keyed dictionary.
//!
//! A [`Dictionary`] maps a tuple of key-column values to replacement values
//! for one or more target columns plus a score increment. Dictionaries are
//! built per stage and applied exactly once; they are never persisted.

use std::collections::HashMap;

use log::info;

use crate::{Document, Field};

/// Replacement values for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct DisambiguationEntry {
    pub targets: Vec<(Field, String)>,
    /// Added to the token's running score when the key matches
    pub score: f64,
}

impl DisambiguationEntry {
    pub fn new(target: Field, value: impl Into<String>, score: f64) -> Self {
        Self {
            targets: vec![(target, value.into())],
            score,
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.targets
            .iter()
            .find(|(target, _)| *target == field)
            .map(|(_, value)| value.as_str())
    }
}

/// Separates the parts of a stored key; never occurs in column values.
const KEY_SEPARATOR: char = '\u{1f}';

fn push_key<'k>(buffer: &mut String, parts: impl IntoIterator<Item = &'k str>) {
    buffer.clear();
    for (idx, part) in parts.into_iter().enumerate() {
        if idx > 0 {
            buffer.push(KEY_SEPARATOR);
        }
        buffer.push_str(part);
    }
}

/// Key tuple → replacement entry.
///
/// Keys are stored joined, so a lookup only needs a reusable buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, DisambiguationEntry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: AsRef<str>>(&mut self, key: &[S], entry: DisambiguationEntry) {
        let mut joined = String::new();
        push_key(&mut joined, key.iter().map(|part| part.as_ref()));
        self.entries.insert(joined, entry);
    }

    pub fn get<S: AsRef<str>>(&self, key: &[S]) -> Option<&DisambiguationEntry> {
        let mut joined = String::new();
        push_key(&mut joined, key.iter().map(|part| part.as_ref()));
        self.entries.get(&joined)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with their key split back into parts.
    pub fn iter(&self) -> impl Iterator<Item = (Vec<&str>, &DisambiguationEntry)> + '_ {
        self.entries
            .iter()
            .map(|(key, entry)| (key.split(KEY_SEPARATOR).collect(), entry))
    }
}

/// Tallies of one substitution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubstitutionReport {
    /// Tokens visited, locked ones included
    pub tokens: usize,
    /// Unlocked tokens whose key was found
    pub matched: usize,
    /// Individual field values that changed
    pub substitutions: usize,
    /// Sum of score increments handed out
    pub score_total: f64,
}

impl SubstitutionReport {
    pub fn average_score(&self) -> f64 {
        if self.tokens == 0 {
            0.0
        } else {
            self.score_total / self.tokens as f64
        }
    }

    /// Substitutions per visited token, in percent.
    pub fn substitution_rate(&self) -> f64 {
        if self.tokens == 0 {
            0.0
        } else {
            100.0 * self.substitutions as f64 / self.tokens as f64
        }
    }
}

/// Render a score the way it is stored in the score column.
pub fn format_score(score: f64) -> String {
    format!("{:?}", score)
}

impl Document {
    /// Substitute target fields of unlocked tokens whose `key_fields` tuple is
    /// in `dictionary`.
    ///
    /// Each differing target value counts as one substitution. A matched
    /// token's numeric score is increased by the entry score; a placeholder
    /// score is left as it is.
    pub fn apply_dictionary(
        &mut self,
        dictionary: &Dictionary,
        key_fields: &[Field],
    ) -> SubstitutionReport {
        let mut report = SubstitutionReport::default();
        let mut key = String::new();

        for token in self.tokens_mut() {
            report.tokens += 1;
            if token.is_locked() {
                continue;
            }
            push_key(&mut key, key_fields.iter().map(|&field| token.get(field)));
            let entry = match dictionary.entries.get(key.as_str()) {
                Some(entry) => entry,
                None => continue,
            };

            report.matched += 1;
            for (field, value) in &entry.targets {
                if token.get(*field) != value.as_str() {
                    token.set(*field, value.as_str());
                    report.substitutions += 1;
                }
            }
            if let Some(score) = token.score() {
                token.set(Field::Score, format_score(score + entry.score));
            }
            report.score_total += entry.score;
        }

        info!(
            "  + Step score: {:.2} Substitutions: {} ({:.2}%)",
            report.average_score(),
            report.substitutions,
            report.substitution_rate()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLACEHOLDER;

    fn lemma_dictionary(form: &str, tag: &str, lemma: &str) -> Dictionary {
        let mut dictionary = Dictionary::new();
        dictionary.insert(&[form, tag], DisambiguationEntry::new(Field::Lemma, lemma, 1.0));
        dictionary
    }

    #[test]
    fn test_keys_round_trip_through_iter() {
        let dictionary = lemma_dictionary("X", "N|V|<EOU>", "A");
        assert!(dictionary.get(&["X", "N|V|<EOU>"]).is_some());
        assert!(dictionary.get(&["X", "N"]).is_none());
        assert!(dictionary.get(&["XN|V|<EOU>"]).is_none());

        let (key, entry) = dictionary.iter().next().unwrap();
        assert_eq!(key, vec!["X", "N|V|<EOU>"]);
        assert_eq!(entry.value(Field::Lemma), Some("A"));
    }

    #[test]
    fn test_substitutes_matching_token() {
        let mut doc = Document::parse(
            "1\tX\tWRONG\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t3.0\t_\n\
2\tY\tother\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t3.0\t_\n\n",
        );
        let report = doc.apply_dictionary(&lemma_dictionary("X", "N", "A"), &[Field::Form, Field::Xpos]);

        assert_eq!(report.tokens, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.substitutions, 1);
        assert_eq!(report.average_score(), 0.5);
        assert_eq!(report.substitution_rate(), 50.0);

        let first = &doc.units()[0].tokens[0];
        assert_eq!(first.get(Field::Lemma), "A");
        assert_eq!(first.get(Field::Score), "4.0");
        assert_eq!(doc.units()[0].tokens[1].get(Field::Score), "3.0");
    }

    #[test]
    fn test_agreeing_token_gets_score_but_no_substitution() {
        let mut doc = Document::parse("1\tX\tA\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t2.0\t_\n\n");
        let report = doc.apply_dictionary(&lemma_dictionary("X", "N", "A"), &[Field::Form, Field::Xpos]);
        assert_eq!(report.substitutions, 0);
        assert_eq!(report.matched, 1);
        assert_eq!(doc.units()[0].tokens[0].get(Field::Score), "3.0");
    }

    #[test]
    fn test_locked_token_is_untouched() {
        let line = "1\tX\tWRONG\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t3.0\tgold\n\n";
        let mut doc = Document::parse(line);
        let report = doc.apply_dictionary(&lemma_dictionary("X", "N", "A"), &[Field::Form, Field::Xpos]);
        assert_eq!(report.tokens, 1);
        assert_eq!(report.matched, 0);
        assert_eq!(doc.serialize(), line);
    }

    #[test]
    fn test_placeholder_score_is_not_fabricated() {
        let mut doc = Document::parse("1\tX\tWRONG\tN\tN\n\n");
        doc.apply_dictionary(&lemma_dictionary("X", "N", "A"), &[Field::Form, Field::Xpos]);
        let token = &doc.units()[0].tokens[0];
        assert_eq!(token.get(Field::Lemma), "A");
        assert_eq!(token.get(Field::Score), PLACEHOLDER);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(4.0), "4.0");
        assert_eq!(format_score(2.5), "2.5");
        assert_eq!(format_score(0.0), "0.0");
    }
}
