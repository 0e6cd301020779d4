//! Disambiguation dictionaries built from reference data.
//!
//! The reference document is only read. Its locked rows are evidence like any
//! other row; locks only protect the document being corrected.

use std::borrow::Cow;
use std::collections::HashMap;

use layered_conllu::{DisambiguationEntry, Dictionary, Document, Field, PLACEHOLDER};
use log::info;

/// Score increment carried by every accepted entry.
pub const ENTRY_SCORE: f64 = 1.0;

/// How many keys a build saw and kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryStats {
    pub keys_seen: usize,
    pub keys_accepted: usize,
}

impl DictionaryStats {
    pub fn acceptance_rate(&self) -> f64 {
        if self.keys_seen == 0 {
            0.0
        } else {
            100.0 * self.keys_accepted as f64 / self.keys_seen as f64
        }
    }
}

type Key<'a> = Vec<Cow<'a, str>>;

struct KeyTally<'a> {
    key: Key<'a>,
    /// Values in first-seen order, placeholders included
    values: Vec<(&'a str, usize)>,
}

impl<'a> KeyTally<'a> {
    fn add(&mut self, value: &'a str) {
        match self.values.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => self.values.push((value, 1)),
        }
    }

    /// Most frequent non-placeholder value and its share of all values of
    /// the key; the earliest wins a tie.
    fn majority(&self) -> Option<(&'a str, f64)> {
        let total: usize = self.values.iter().map(|(_, count)| count).sum();
        let mut best: Option<(&'a str, usize)> = None;
        for &(value, count) in &self.values {
            if value == PLACEHOLDER {
                continue;
            }
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best.map(|(value, count)| (value, count as f64 / total as f64))
    }
}

/// Map each `key_fields` tuple of `reference` to its majority `target` value.
///
/// A key is accepted only when the majority value's share of all its values,
/// placeholders included, is at least `threshold`. The placeholder itself is
/// never handed out as a replacement, and competing values are never blended.
pub fn build_dictionary(
    reference: &Document,
    key_fields: &[Field],
    target: Field,
    threshold: f64,
) -> Dictionary {
    build_dictionary_with_stats(reference, key_fields, target, threshold).0
}

pub fn build_dictionary_with_stats(
    reference: &Document,
    key_fields: &[Field],
    target: Field,
    threshold: f64,
) -> (Dictionary, DictionaryStats) {
    let rows = reference.tokens().map(|token| {
        let key: Key<'_> = key_fields
            .iter()
            .map(|&field| Cow::Borrowed(token.get(field)))
            .collect();
        (key, token.get(target))
    });
    let label = format!("{:?} -> {}", key_fields, target);
    tally_rows(rows, target, threshold, &label)
}

/// Map each (form, `anchor` context window) of `reference` to its majority
/// `target` value.
///
/// Windows are computed from the reference on the fly, so the stored
/// context column of the reference is neither read nor written. Keys match
/// context columns filled by [`Document::refresh_context`] with the same
/// `half_window`.
pub fn build_context_dictionary(
    reference: &Document,
    anchor: Field,
    half_window: usize,
    target: Field,
    threshold: f64,
) -> Dictionary {
    build_context_dictionary_with_stats(reference, anchor, half_window, target, threshold).0
}

pub fn build_context_dictionary_with_stats(
    reference: &Document,
    anchor: Field,
    half_window: usize,
    target: Field,
    threshold: f64,
) -> (Dictionary, DictionaryStats) {
    let rows = reference
        .context(anchor, half_window)
        .zip(reference.tokens())
        .map(|(window, token)| {
            let key: Key<'_> = vec![
                Cow::Borrowed(token.get(Field::Form)),
                Cow::Owned(window.joined()),
            ];
            (key, token.get(target))
        });
    let label = format!("[Form, {} context] -> {}", anchor, target);
    tally_rows(rows, target, threshold, &label)
}

fn tally_rows<'a, I>(rows: I, target: Field, threshold: f64, label: &str) -> (Dictionary, DictionaryStats)
where
    I: Iterator<Item = (Key<'a>, &'a str)>,
{
    let mut slots: HashMap<Key<'a>, usize> = HashMap::new();
    let mut tallies: Vec<KeyTally<'a>> = Vec::new();

    for (key, value) in rows {
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), tallies.len());
                tallies.push(KeyTally {
                    key,
                    values: Vec::new(),
                });
                tallies.len() - 1
            }
        };
        tallies[slot].add(value);
    }

    let mut dictionary = Dictionary::new();
    let mut stats = DictionaryStats {
        keys_seen: tallies.len(),
        keys_accepted: 0,
    };
    for tally in &tallies {
        if let Some((value, share)) = tally.majority() {
            if share >= threshold {
                dictionary.insert(&tally.key, DisambiguationEntry::new(target, value, ENTRY_SCORE));
                stats.keys_accepted += 1;
            }
        }
    }

    info!(
        "  + Dictionary {}: {} of {} keys accepted ({:.2}%)",
        label,
        stats.keys_accepted,
        stats.keys_seen,
        stats.acceptance_rate()
    );
    (dictionary, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(rows: &[(&str, &str, &str)]) -> Document {
        let mut text = String::new();
        for (form, lemma, tag) in rows {
            text.push_str(&format!("1\t{}\t{}\t{}\t{}\n", form, lemma, tag, tag));
        }
        text.push('\n');
        Document::parse(&text)
    }

    const KEY: [Field; 2] = [Field::Form, Field::Xpos];

    #[test]
    fn test_nine_to_one_majority_is_accepted() {
        let mut rows = vec![("X", "A", "N"); 9];
        rows.push(("X", "B", "N"));
        let (dictionary, stats) =
            build_dictionary_with_stats(&reference(&rows), &KEY, Field::Lemma, 0.7);

        assert_eq!(dictionary.len(), 1);
        let entry = dictionary.get(&["X", "N"]).unwrap();
        assert_eq!(entry.value(Field::Lemma), Some("A"));
        assert_eq!(entry.score, 1.0);
        assert_eq!(stats, DictionaryStats { keys_seen: 1, keys_accepted: 1 });
    }

    #[test]
    fn test_split_key_is_rejected() {
        let rows = [("X", "A", "N"), ("X", "B", "N"), ("X", "A", "N"), ("X", "B", "N")];
        let dictionary = build_dictionary(&reference(&rows), &KEY, Field::Lemma, 0.7);
        assert!(dictionary.is_empty());
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let rows = [("X", "B", "N"), ("X", "A", "N")];
        let dictionary = build_dictionary(&reference(&rows), &KEY, Field::Lemma, 0.5);
        assert_eq!(dictionary.get(&["X", "N"]).unwrap().value(Field::Lemma), Some("B"));
    }

    #[test]
    fn test_keys_are_separated_by_tag() {
        let rows = [("X", "A", "N"), ("X", "B", "V")];
        let dictionary = build_dictionary(&reference(&rows), &KEY, Field::Lemma, 1.0);
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.get(&["X", "V"]).unwrap().value(Field::Lemma), Some("B"));
    }

    #[test]
    fn test_placeholder_values_count_toward_share() {
        let rows = [("X", "A", "N"), ("X", "_", "N"), ("X", "_", "N"), ("Y", "_", "N")];
        let reference = reference(&rows);

        let (dictionary, stats) = build_dictionary_with_stats(&reference, &KEY, Field::Lemma, 0.7);
        assert!(dictionary.is_empty());
        assert_eq!(stats, DictionaryStats { keys_seen: 2, keys_accepted: 0 });

        // A holds a third of the (X, N) rows; the placeholder is never handed out
        let dictionary = build_dictionary(&reference, &KEY, Field::Lemma, 0.3);
        assert_eq!(dictionary.get(&["X", "N"]).unwrap().value(Field::Lemma), Some("A"));
        assert!(dictionary.get(&["Y", "N"]).is_none());
    }

    #[test]
    fn test_context_dictionary_reads_locked_rows() {
        let locked = "1\tDUMU\tmāru\tN\tN\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\tgold\n\
2\tillik\talāku\tV\tV\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\tgold\n\n";
        let text = format!("{}{}1\tDUMU\tmārtu\tN\tN\n2\tIštar\tIštar\tDN\tDN\n\n", locked, locked);
        let reference = Document::parse(&text);
        let before = reference.clone();

        let (dictionary, stats) =
            build_context_dictionary_with_stats(&reference, Field::Xpos, 1, Field::Lemma, 0.7);
        assert_eq!(reference, before);
        assert_eq!(stats.keys_seen, 4);
        assert_eq!(
            dictionary.get(&["DUMU", "<SOU>|N|V"]).unwrap().value(Field::Lemma),
            Some("māru")
        );
        assert_eq!(
            dictionary.get(&["DUMU", "<SOU>|N|DN"]).unwrap().value(Field::Lemma),
            Some("mārtu")
        );
        assert!(dictionary.get(&["DUMU", "_"]).is_none());
    }

    #[test]
    fn test_no_accepted_key_below_threshold() {
        let mut rows = Vec::new();
        for (idx, lemma) in ["a", "b", "c", "a", "a", "b", "a", "c", "a", "a"].iter().enumerate() {
            let form = if idx % 2 == 0 { "P" } else { "Q" };
            rows.push((form, *lemma, "N"));
        }
        let reference = reference(&rows);
        for threshold in [0.3, 0.5, 0.6, 0.8, 1.0] {
            let dictionary = build_dictionary(&reference, &KEY, Field::Lemma, threshold);
            for (key, entry) in dictionary.iter() {
                let value = entry.value(Field::Lemma).unwrap();
                let matching: Vec<_> = reference
                    .field_tuples([Field::Form, Field::Xpos, Field::Lemma])
                    .filter(|[form, tag, _]| [*form, *tag] == [key[0], key[1]])
                    .collect();
                let share = matching.iter().filter(|[_, _, lemma]| *lemma == value).count() as f64
                    / matching.len() as f64;
                assert!(share >= threshold, "{:?} accepted at {}", key, threshold);
            }
        }
    }
}
