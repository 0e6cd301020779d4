//! Line formats exchanged with the external tagger and lemmatizer.
//!
//! Both models read one line per token with a boundary line after every unit
//! and answer with one prediction per line.

use log::warn;

use crate::{ConlluResult, Document, Field};

/// Boundary line written after every unit.
pub const BOUNDARY: &str = "<EOU>";

/// Segment marker some models echo back; never a prediction.
pub const SEGMENT: &str = "<SEG>";

fn push_unit_boundary(out: &mut String) {
    out.push_str(BOUNDARY);
    out.push('\n');
}

/// Tagger input: `{left} << {form} >> {right}` from the form context window.
pub fn tagger_input(doc: &Document, half_window: usize) -> String {
    let mut out = String::new();
    for unit in doc.units() {
        for window in crate::context::windows(unit.values(Field::Form), half_window) {
            out.push_str(&format!(
                "{} << {} >> {}\n",
                window.left().join(" "),
                window.anchor(),
                window.right().join(" ")
            ));
        }
        push_unit_boundary(&mut out);
    }
    out
}

/// Lemmatizer input: `{form} PREV={left} UPOS={tag} NEXT={right}`, where the
/// neighbours come from the tag context window.
pub fn lemmatizer_input(doc: &Document, half_window: usize) -> String {
    let mut out = String::new();
    for unit in doc.units() {
        let tags = crate::context::windows(unit.values(Field::Xpos), half_window);
        for (form, window) in unit.values(Field::Form).zip(tags) {
            out.push_str(&format!(
                "{} PREV={} UPOS={} NEXT={}\n",
                form,
                window.left().join(" "),
                window.anchor(),
                window.right().join(" ")
            ));
        }
        push_unit_boundary(&mut out);
    }
    out
}

/// One trimmed value per prediction line; boundary markers and blank lines
/// are dropped.
pub fn parse_predictions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != BOUNDARY && *line != SEGMENT)
        .map(str::to_string)
        .collect()
}

/// Write model output into `field` of `doc`.
///
/// Short output fails with [`crate::ConlluError::ExhaustedInput`] and leaves
/// the document untouched.
pub fn merge_predictions(doc: &mut Document, field: Field, text: &str) -> ConlluResult<usize> {
    let predictions = parse_predictions(text);
    if predictions.len() > doc.token_count() {
        warn!(
            "{} predictions for {} tokens; surplus ignored",
            predictions.len(),
            doc.token_count()
        );
    }
    doc.update_field(field, predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConlluError;

    fn doc() -> Document {
        Document::parse(
            "1\ta-na\t_\tPRP\tPRP\n\
2\tbe-li2\t_\tN\tN\n\
\n\
1\tqi2-bi2-ma\t_\tV\tV\n\
\n",
        )
    }

    #[test]
    fn test_tagger_input() {
        insta::assert_snapshot!(tagger_input(&doc(), 1).trim_end(), @r###"
        <SOU> << a-na >> be-li2
        a-na << be-li2 >> <EOU>
        <EOU>
        <SOU> << qi2-bi2-ma >> <EOU>
        <EOU>
        "###);
    }

    #[test]
    fn test_lemmatizer_input() {
        insta::assert_snapshot!(lemmatizer_input(&doc(), 1).trim_end(), @r###"
        a-na PREV=<SOU> UPOS=PRP NEXT=N
        be-li2 PREV=PRP UPOS=N NEXT=<EOU>
        <EOU>
        qi2-bi2-ma PREV=<SOU> UPOS=V NEXT=<EOU>
        <EOU>
        "###);
    }

    #[test]
    fn test_parse_predictions_drops_markers() {
        let parsed = parse_predictions(" ana \nbēlu\n<EOU>\n\n<SEG>\nqabû\n<EOU>\n");
        assert_eq!(parsed, vec!["ana", "bēlu", "qabû"]);
    }

    #[test]
    fn test_merge_predictions() {
        let mut doc = doc();
        let written = merge_predictions(&mut doc, Field::Lemma, "ana\nbēlu\n<EOU>\nqabû\n<EOU>\n").unwrap();
        assert_eq!(written, 3);
        let lemmas: Vec<_> = doc.field_values(Field::Lemma).collect();
        assert_eq!(lemmas, vec!["ana", "bēlu", "qabû"]);
    }

    #[test]
    fn test_short_output_leaves_document_untouched() {
        let mut doc = doc();
        let before = doc.clone();
        let err = merge_predictions(&mut doc, Field::Lemma, "ana\n<EOU>\n").unwrap_err();
        assert!(matches!(
            err,
            ConlluError::ExhaustedInput {
                field: Field::Lemma,
                expected: 3,
                received: 1
            }
        ));
        assert_eq!(doc, before);
    }
}
