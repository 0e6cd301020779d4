//! The postprocessing pass over one prediction document.
//!
//! Stages run in a fixed linear order:
//! 1. `initialize_scores` - confidence level per token
//! 2. `fill_unambiguous` - (form, xpos) → lemma from reference data
//! 3. `disambiguate_by_pos_context` - (form, xpos context) → lemma
//! 4. `apply_override` / `skip_override` - manual corrections, score 4.0
//! 5. `finalize` - scrub context columns, hand out a [`Finalized`] document
//!
//! Only a [`Finalized`] document can be written or turned into a glossary.

use std::fmt;
use std::path::{Path, PathBuf};

use layered_conllu::{Document, Field, Glossary, SubstitutionReport, PLACEHOLDER};
use log::info;

use crate::{
    build_context_dictionary, build_dictionary, initialize_scores, OovSet, OverrideTable,
    PostprocessConfig, PostprocessError, PostprocessResult,
};

/// Lifecycle of a prediction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Raw,
    Scored,
    UnambiguousFilled,
    ContextDisambiguated,
    Overridden,
    Finalized,
}

impl Stage {
    /// The only stage allowed to follow this one.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Raw => Some(Stage::Scored),
            Stage::Scored => Some(Stage::UnambiguousFilled),
            Stage::UnambiguousFilled => Some(Stage::ContextDisambiguated),
            Stage::ContextDisambiguated => Some(Stage::Overridden),
            Stage::Overridden => Some(Stage::Finalized),
            Stage::Finalized => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Scored => "scored",
            Stage::UnambiguousFilled => "unambiguous-filled",
            Stage::ContextDisambiguated => "context-disambiguated",
            Stage::Overridden => "overridden",
            Stage::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tallies of the substitution stages of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageReports {
    pub unambiguous: SubstitutionReport,
    pub context: SubstitutionReport,
    /// Tokens written by the override stage
    pub overridden: usize,
}

/// Drives one prediction document through the stages.
#[derive(Debug)]
pub struct Postprocessor {
    predictions: Document,
    reference: Document,
    config: PostprocessConfig,
    stage: Stage,
    reports: StageReports,
}

impl Postprocessor {
    pub fn new(predictions: Document, reference: Document, config: PostprocessConfig) -> Self {
        Self {
            predictions,
            reference,
            config,
            stage: Stage::Raw,
            reports: StageReports::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn predictions(&self) -> &Document {
        &self.predictions
    }

    pub fn config(&self) -> &PostprocessConfig {
        &self.config
    }

    pub fn reports(&self) -> &StageReports {
        &self.reports
    }

    fn enter(&mut self, requested: Stage) -> PostprocessResult<()> {
        if self.stage.next() != Some(requested) {
            return Err(PostprocessError::StageOrder {
                current: self.stage,
                requested,
            });
        }
        self.stage = requested;
        Ok(())
    }

    /// Raw → Scored.
    pub fn initialize_scores(&mut self, oov: &OovSet) -> PostprocessResult<usize> {
        self.enter(Stage::Scored)?;
        info!("> Post-processor: initializing confidence scores");
        Ok(initialize_scores(&mut self.predictions, oov)?)
    }

    /// Scored → UnambiguousFilled.
    pub fn fill_unambiguous(&mut self, threshold: f64) -> PostprocessResult<SubstitutionReport> {
        self.enter(Stage::UnambiguousFilled)?;
        info!("> Post-processor: filling in unambiguous words (t >= {})", threshold);
        let key = [Field::Form, Field::Xpos];
        let dictionary = build_dictionary(&self.reference, &key, Field::Lemma, threshold);
        let report = self.predictions.apply_dictionary(&dictionary, &key);
        self.reports.unambiguous = report;
        Ok(report)
    }

    /// Recompute the xpos context column of the predictions.
    ///
    /// Allowed at any point before the context stage has run.
    pub fn refresh_context(&mut self) -> PostprocessResult<usize> {
        if self.stage >= Stage::ContextDisambiguated {
            return Err(PostprocessError::StageOrder {
                current: self.stage,
                requested: Stage::ContextDisambiguated,
            });
        }
        let k = self.config.context_window;
        Ok(self
            .predictions
            .refresh_context(Field::Xpos, Field::XposCtx, k)?)
    }

    /// UnambiguousFilled → ContextDisambiguated.
    ///
    /// Expects the predictions' xpos context to be populated already. The
    /// reference windows are computed without writing to the reference, so
    /// its locked rows count as evidence too.
    pub fn disambiguate_by_pos_context(
        &mut self,
        threshold: f64,
    ) -> PostprocessResult<SubstitutionReport> {
        self.enter(Stage::ContextDisambiguated)?;
        info!("> Post-processor: disambiguating by xpos context (t >= {})", threshold);
        let dictionary = build_context_dictionary(
            &self.reference,
            Field::Xpos,
            self.config.context_window,
            Field::Lemma,
            threshold,
        );
        let report = self
            .predictions
            .apply_dictionary(&dictionary, &[Field::Form, Field::XposCtx]);
        self.reports.context = report;
        Ok(report)
    }

    /// ContextDisambiguated → Overridden, writing the manual corrections.
    pub fn apply_override(&mut self, table: &OverrideTable) -> PostprocessResult<usize> {
        self.enter(Stage::Overridden)?;
        info!("> Post-processor: applying {} overrides", table.len());
        let overridden = table.apply(&mut self.predictions)?;
        self.reports.overridden = overridden;
        Ok(overridden)
    }

    /// ContextDisambiguated → Overridden without a table.
    pub fn skip_override(&mut self) -> PostprocessResult<()> {
        self.enter(Stage::Overridden)?;
        info!("> Post-processor: no override table, skipping");
        Ok(())
    }

    /// Overridden → Finalized. Scrubs the transient context columns.
    pub fn finalize(mut self) -> PostprocessResult<Finalized> {
        self.enter(Stage::Finalized)?;
        for field in Field::ALL.iter().copied().filter(|field| field.is_transient()) {
            self.predictions.force_field(field, PLACEHOLDER);
        }
        if self.config.write_header {
            self.predictions.set_generated_header();
        }
        Ok(Finalized {
            document: self.predictions,
            glossary_threshold: self.config.glossary_threshold,
            reports: self.reports,
        })
    }

    /// Run every stage with the configured thresholds.
    pub fn run(
        mut self,
        oov: &OovSet,
        overrides: Option<&OverrideTable>,
    ) -> PostprocessResult<Finalized> {
        self.initialize_scores(oov)?;
        self.fill_unambiguous(self.config.fill_threshold)?;
        self.refresh_context()?;
        self.disambiguate_by_pos_context(self.config.context_threshold)?;
        match overrides {
            Some(table) => {
                self.apply_override(table)?;
            }
            None => self.skip_override()?,
        }
        self.finalize()
    }
}

/// A fully postprocessed document.
#[derive(Debug)]
pub struct Finalized {
    document: Document,
    glossary_threshold: f64,
    reports: StageReports,
}

impl Finalized {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn reports(&self) -> &StageReports {
        &self.reports
    }

    pub fn serialize(&self) -> String {
        self.document.serialize()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> PostprocessResult<()> {
        Ok(self.document.write(path)?)
    }

    /// Tokens scored at or below the configured glossary threshold.
    pub fn glossary(&self) -> Glossary {
        self.document
            .extract_low_confidence_glossary(self.glossary_threshold)
    }

    /// Write the glossary bucket files into `dir`.
    pub fn write_glossary(
        &self,
        dir: impl AsRef<Path>,
        prefix: &str,
    ) -> PostprocessResult<Vec<PathBuf>> {
        Ok(self.glossary().write_files(dir, prefix)?)
    }
}
