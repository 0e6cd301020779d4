//! Postprocessing of lemmatizer predictions held in a layered-conllu
//! [`Document`](layered_conllu::Document).
//!
//! ## Core Types
//!
//! - [`Postprocessor`] - runs the stages in order, checked by [`Stage`]
//! - [`ConfidenceLevel`] - the closed set of trust levels in the score column
//! - [`build_dictionary`] - majority lemma per key in reference data
//! - [`OverrideTable`] - manual corrections, applied last
//! - [`PostprocessConfig`] - thresholds, loadable from TOML
//!
//! ## Example
//!
//! ```
//! use layered_conllu::{Document, Field};
//! use layered_postprocess::{OovSet, PostprocessConfig, Postprocessor};
//!
//! let reference = Document::parse("1\tKUR\tmātu\tN\tN\n\n");
//! let predictions = Document::parse("1\tKUR\tšadû\tN\tN\n\n");
//! let oov: OovSet = ["KUR"].into_iter().collect();
//!
//! let finalized = Postprocessor::new(predictions, reference, PostprocessConfig::default())
//!     .run(&oov, None)
//!     .unwrap();
//! let token = finalized.document().tokens().next().unwrap();
//! assert_eq!(token.get(Field::Lemma), "mātu");
//! // 0.0 for an unseen logogram, plus one for each matching dictionary
//! assert_eq!(token.get(Field::Score), "2.0");
//! ```

mod confidence;
mod config;
mod dictionary;
mod errors;
mod override_table;
mod postprocessor;


pub use confidence::{initialize_scores, ConfidenceLevel, OovSet};
pub use config::PostprocessConfig;
pub use dictionary::{
    build_context_dictionary, build_context_dictionary_with_stats, build_dictionary,
    build_dictionary_with_stats, DictionaryStats, ENTRY_SCORE,
};
pub use errors::{PostprocessError, PostprocessResult};
pub use override_table::{OverrideEntry, OverrideTable};
pub use postprocessor::{Finalized, Postprocessor, Stage, StageReports};
