#![doc(html_root_url = "https://docs.rs/layered-conllu/0.1.0")]
//! Extended CoNLL-U document model for annotation pipelines.
//!
//! A document is a sequence of sentence-like units, each a list of token
//! records with seventeen columns: the ten CoNLL-U columns plus `eng`,
//! `norm`, `lang`, `formctx`, `xposctx`, `score` and `lock`. Pipeline stages
//! read columns and context windows and write them back through mutators
//! that never touch a locked record.
//!
//! ## Core Types
//!
//! - [`Document`] - parse, serialize, query and update a whole file
//! - [`TokenRecord`] / [`AnnotationUnit`] - one token line / one unit
//! - [`Field`] - column identifiers
//! - [`ContextWindow`] - neighbours of a token within its unit
//! - [`Dictionary`] - keyed replacements for [`Document::apply_dictionary`]
//! - [`Glossary`] - low-confidence tokens grouped for review
//!
//! ## Example
//!
//! ```
//! use layered_conllu::{Document, Field};
//!
//! let mut doc = Document::parse("1\ta-na\t_\tPRP\tPRP\n2\tbe-li2\t_\tN\tN\n\n");
//! assert_eq!(doc.token_count(), 2);
//!
//! doc.refresh_context(Field::Xpos, Field::XposCtx, 1).unwrap();
//! let contexts: Vec<_> = doc.field_values(Field::XposCtx).collect();
//! assert_eq!(contexts, vec!["<SOU>|PRP|N", "PRP|N|<EOU>"]);
//! ```

mod context;
mod display;
mod document;
mod errors;
mod field;
mod glossary;
mod normalize;
mod predictor;
mod special;
mod substitution;
mod token;
mod validation;

#[cfg(test)]
mod tests;

pub use context::{windows, ContextWindow, Windows, END_OF_UNIT, START_OF_UNIT, WINDOW_SEPARATOR};
pub use display::UnitDisplay;
pub use document::{
    Document, FieldFrequency, ParseOptions, ParseResult, COMMENT_MARKER, GLOBAL_PREFIX,
};
pub use errors::{ConlluError, ConlluResult};
pub use field::{Field, FIELD_COUNT, PLACEHOLDER};
pub use glossary::{
    Glossary, GlossaryBucket, GlossaryCandidate, GlossaryForm, AMBIGUOUS_SEPARATOR,
    UNAMBIGUOUS_SEPARATOR,
};
pub use normalize::{Normalizer, TransliterationNormalizer};
pub use predictor::{
    lemmatizer_input, merge_predictions, parse_predictions, tagger_input, BOUNDARY, SEGMENT,
};
pub use special::{has_lacuna_sign, has_special_marker, SpecialCategory, MISC_KEY};
pub use substitution::{format_score, DisambiguationEntry, Dictionary, SubstitutionReport};
pub use token::{AnnotationUnit, TokenRecord};
pub use validation::{ParseReport, ValidationCategory, ValidationWarning};
