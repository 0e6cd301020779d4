use crate::{
    Document, Field, ParseOptions, SpecialCategory, TransliterationNormalizer,
    ValidationCategory, END_OF_UNIT, START_OF_UNIT,
};
use std::fs;
use std::path::Path;

fn fixture_text(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).expect(&format!("Failed to read fixture: {}", name))
}

fn letter() -> Document {
    Document::parse(&fixture_text("letter.conllu"))
}

#[test]
fn test_fixture_round_trip_is_byte_identical() {
    let text = fixture_text("letter.conllu");
    let doc = Document::parse(&text);
    assert_eq!(doc.serialize(), text);
    assert_eq!(Document::parse(&doc.serialize()), doc);
}

#[test]
fn test_fixture_shape() {
    let doc = letter();
    assert_eq!(doc.header().len(), 1);
    assert_eq!(doc.unit_count(), 2);
    assert_eq!(doc.token_count(), 8);
    assert_eq!(doc.units()[1].comments, vec!["# sent_id = letter-2"]);
}

#[test]
fn test_fixture_validation() {
    let result = Document::read(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/letter.conllu"),
        ParseOptions::default(),
    )
    .unwrap();
    assert_eq!(result.report.len(), 1);
    assert_eq!(result.report.count(ValidationCategory::LemmaMissing), 1);
    assert_eq!(result.report.warnings[0].to_string(), "000012 | 3 <> _ <> n");

    let quiet = Document::parse_with(
        &fixture_text("letter.conllu"),
        ParseOptions { validate: false },
    );
    assert!(quiet.report.is_clean());
}

#[test]
fn test_windows_never_cross_units() {
    let doc = letter();
    for k in 0..4 {
        let windows: Vec<_> = doc.context(Field::Form, k).collect();
        assert_eq!(windows.len(), doc.token_count());

        let forms: Vec<_> = doc.field_values(Field::Form).collect();
        for (window, form) in windows.iter().zip(&forms) {
            assert_eq!(window.parts().len(), 2 * k + 1);
            assert_eq!(window.anchor(), *form);
        }

        if k > 0 {
            // last token of the first unit sees only end sentinels on its right
            assert!(windows[2].right().iter().all(|part| *part == END_OF_UNIT));
            // first token of the second unit sees only start sentinels on its left
            assert!(windows[3].left().iter().all(|part| *part == START_OF_UNIT));
        }
    }
}

#[test]
fn test_stored_context_column() {
    let mut doc = letter();
    doc.refresh_context(Field::Xpos, Field::XposCtx, 1).unwrap();
    let stored: Vec<_> = doc.field_values(Field::XposCtx).collect();
    insta::assert_debug_snapshot!(stored, @r###"
    [
        "<SOU>|PRP|N",
        "PRP|N|V",
        "N|V|<EOU>",
        "<SOU>|PRP|PN",
        "_",
        "PN|N|n",
        "N|n|u",
        "n|u|<EOU>",
    ]
    "###);
}

#[test]
fn test_locked_record_survives_every_mutator() {
    let mut doc = letter();
    let locked_before = doc.units()[1].tokens[1].clone();
    assert!(locked_before.is_locked());

    let count = doc.token_count();
    doc.update_field(Field::Lemma, vec!["changed"; count]).unwrap();
    doc.force_field(Field::Eng, "_");
    doc.normalize(&TransliterationNormalizer);
    doc.unlemmatize_special(&SpecialCategory::ALL);
    doc.refresh_context(Field::Form, Field::FormCtx, 2).unwrap();

    assert_eq!(doc.units()[1].tokens[1], locked_before);
    assert_eq!(doc.units()[0].tokens[0].get(Field::Lemma), "changed");
}

#[test]
fn test_word_freqs() {
    let freqs = letter().word_freqs(Field::Xpos);
    assert_eq!(freqs[0].value, "PRP");
    assert_eq!(freqs[0].count, 2);
    assert_eq!(freqs[0].percent, 25.0);
    assert_eq!(freqs[1].value, "N");
}
