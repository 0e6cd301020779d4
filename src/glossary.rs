//! Low-confidence glossary export for human review.
//!
//! Tokens at or below a score threshold are grouped by score bucket, then by
//! form, with a tally of the (lemma, tag) analyses each form received. A form
//! with more than one analysis is written with [`AMBIGUOUS_SEPARATOR`] so a
//! reviewer can spot it; the files can be fed back as override tables.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::{ConlluError, ConlluResult, Document, Field};

/// Column separator for forms with a single analysis.
pub const UNAMBIGUOUS_SEPARATOR: char = '\t';

/// Column separator for forms with competing analyses.
pub const AMBIGUOUS_SEPARATOR: char = ';';

/// One (lemma, tag) analysis of a form and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryCandidate {
    pub lemma: String,
    pub tag: String,
    pub count: usize,
}

/// A form with its candidate analyses, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryForm {
    pub form: String,
    /// Occurrences of the form within the bucket
    pub frequency: usize,
    pub candidates: Vec<GlossaryCandidate>,
}

impl GlossaryForm {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn separator(&self) -> char {
        if self.is_ambiguous() {
            AMBIGUOUS_SEPARATOR
        } else {
            UNAMBIGUOUS_SEPARATOR
        }
    }

    /// `form SEP lemma SEP tag SEP count`, one row per candidate.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        let sep = self.separator();
        self.candidates.iter().map(move |c| {
            format!(
                "{}{sep}{}{sep}{}{sep}{}",
                self.form,
                c.lemma,
                c.tag,
                c.count,
                sep = sep
            )
        })
    }
}

/// All forms sharing one score.
#[derive(Debug, Clone, PartialEq)]
pub struct GlossaryBucket {
    pub score: f64,
    pub forms: Vec<GlossaryForm>,
}

impl GlossaryBucket {
    /// Score rendered with one decimal, used in file names.
    pub fn label(&self) -> String {
        format!("{:.1}", self.score)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for form in &self.forms {
            for row in form.rows() {
                out.push_str(&row);
                out.push('\n');
            }
        }
        out
    }
}

/// Buckets in ascending score order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glossary {
    pub buckets: Vec<GlossaryBucket>,
}

impl Glossary {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, score: f64) -> Option<&GlossaryBucket> {
        self.buckets
            .iter()
            .find(|bucket| (bucket.score - score).abs() < f64::EPSILON)
    }

    /// Write one `{prefix}.score-{label}.tsv` file per bucket into `dir`.
    pub fn write_files(&self, dir: impl AsRef<Path>, prefix: &str) -> ConlluResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            let path = dir.join(format!("{}.score-{}.tsv", prefix, bucket.label()));
            info!("Writing glossary {}", path.display());
            fs::write(&path, bucket.render()).map_err(|e| ConlluError::io(&path, e))?;
            written.push(path);
        }
        Ok(written)
    }
}

#[derive(Default)]
struct BucketTally<'a> {
    form_slots: HashMap<&'a str, usize>,
    forms: Vec<FormTally<'a>>,
}

struct FormTally<'a> {
    form: &'a str,
    frequency: usize,
    slots: HashMap<(&'a str, &'a str), usize>,
    candidates: Vec<((&'a str, &'a str), usize)>,
}

impl<'a> BucketTally<'a> {
    fn add(&mut self, form: &'a str, lemma: &'a str, tag: &'a str) {
        let slot = match self.form_slots.get(form) {
            Some(&slot) => slot,
            None => {
                self.form_slots.insert(form, self.forms.len());
                self.forms.push(FormTally {
                    form,
                    frequency: 0,
                    slots: HashMap::new(),
                    candidates: Vec::new(),
                });
                self.forms.len() - 1
            }
        };
        let tally = &mut self.forms[slot];
        tally.frequency += 1;
        match tally.slots.get(&(lemma, tag)) {
            Some(&idx) => tally.candidates[idx].1 += 1,
            None => {
                tally.slots.insert((lemma, tag), tally.candidates.len());
                tally.candidates.push(((lemma, tag), 1));
            }
        }
    }

    fn into_forms(self) -> Vec<GlossaryForm> {
        let mut forms: Vec<GlossaryForm> = self
            .forms
            .into_iter()
            .map(|tally| {
                let mut candidates: Vec<_> = tally
                    .candidates
                    .into_iter()
                    .map(|((lemma, tag), count)| GlossaryCandidate {
                        lemma: lemma.to_string(),
                        tag: tag.to_string(),
                        count,
                    })
                    .collect();
                candidates.sort_by(|a, b| b.count.cmp(&a.count));
                GlossaryForm {
                    form: tally.form.to_string(),
                    frequency: tally.frequency,
                    candidates,
                }
            })
            .collect();
        forms.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        forms
    }
}

impl Document {
    /// Group tokens with a numeric score `<= threshold` for review.
    ///
    /// Tokens without a numeric score are not reviewed. Sorting is by form
    /// frequency, then candidate frequency, both descending; ties keep
    /// first-seen order.
    pub fn extract_low_confidence_glossary(&self, threshold: f64) -> Glossary {
        let mut scores: Vec<f64> = Vec::new();
        let mut tallies: Vec<BucketTally<'_>> = Vec::new();

        for token in self.tokens() {
            let score = match token.score() {
                Some(score) if score <= threshold => score,
                _ => continue,
            };
            let slot = match scores.iter().position(|s| (s - score).abs() < f64::EPSILON) {
                Some(slot) => slot,
                None => {
                    scores.push(score);
                    tallies.push(BucketTally::default());
                    scores.len() - 1
                }
            };
            tallies[slot].add(
                token.get(Field::Form),
                token.get(Field::Lemma),
                token.get(Field::Xpos),
            );
        }

        let mut buckets: Vec<GlossaryBucket> = scores
            .into_iter()
            .zip(tallies)
            .map(|(score, tally)| GlossaryBucket {
                score,
                forms: tally.into_forms(),
            })
            .collect();
        buckets.sort_by(|a, b| a.score.total_cmp(&b.score));

        Glossary { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(form: &str, lemma: &str, tag: &str, score: &str) -> String {
        format!(
            "1\t{}\t{}\t{}\t{}\t_\t_\t_\t_\t_\t_\t_\t_\t_\t_\t{}\t_\n",
            form, lemma, tag, tag, score
        )
    }

    fn sample() -> Document {
        let mut text = String::new();
        text.push_str(&token("DUMU", "māru", "N", "0.0"));
        text.push_str(&token("a-na", "ana", "PRP", "3.0"));
        text.push_str(&token("DUMU", "mārtu", "N", "0.0"));
        text.push_str(&token("DUMU", "māru", "N", "0.0"));
        text.push_str(&token("iš-pur", "šapāru", "V", "2.0"));
        text.push_str(&token("KUR", "mātu", "N", "0.0"));
        text.push_str(&token("3", "_", "n", "_"));
        text.push('\n');
        Document::parse(&text)
    }

    #[test]
    fn test_buckets_and_threshold() {
        let glossary = sample().extract_low_confidence_glossary(2.0);
        let labels: Vec<_> = glossary.buckets.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["0.0", "2.0"]);
        assert!(glossary.bucket(3.0).is_none());
    }

    #[test]
    fn test_rows_sorted_and_flagged() {
        let glossary = sample().extract_low_confidence_glossary(1.0);
        let bucket = glossary.bucket(0.0).unwrap();
        assert_eq!(bucket.forms[0].form, "DUMU");
        assert_eq!(bucket.forms[0].frequency, 3);
        assert!(bucket.forms[0].is_ambiguous());
        assert!(!bucket.forms[1].is_ambiguous());

        insta::assert_snapshot!(bucket.render().trim_end(), @r###"
        DUMU;māru;N;2
        DUMU;mārtu;N;1
        KUR	mātu	N	1
        "###);
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = sample()
            .extract_low_confidence_glossary(2.0)
            .write_files(dir.path(), "letters")
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("letters.score-0.0.tsv"));
        let content = fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(content, "iš-pur\tšapāru\tV\t1\n");
    }
}
