//! Column identifiers of the extended CoNLL-U table.
//!
//! Every token line carries exactly [`FIELD_COUNT`] columns. Code inside the
//! crate addresses columns through [`Field`]; string names are only resolved
//! at the file boundary (config files, headers, CLI glue).

use std::fmt;
use std::str::FromStr;

use crate::ConlluError;

/// Number of columns in a token line.
pub const FIELD_COUNT: usize = 17;

/// Marker for an absent value in any column.
pub const PLACEHOLDER: &str = "_";

/// A column of the extended table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Form,
    Lemma,
    Upos,
    Xpos,
    Feats,
    Head,
    Deprel,
    Deps,
    Misc,
    /// English gloss
    Eng,
    /// Normalized form
    Norm,
    Lang,
    /// Context window of `Form`
    FormCtx,
    /// Context window of `Xpos`
    XposCtx,
    /// Running confidence score
    Score,
    /// Non-placeholder means the whole record is write-protected
    Lock,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Id,
        Field::Form,
        Field::Lemma,
        Field::Upos,
        Field::Xpos,
        Field::Feats,
        Field::Head,
        Field::Deprel,
        Field::Deps,
        Field::Misc,
        Field::Eng,
        Field::Norm,
        Field::Lang,
        Field::FormCtx,
        Field::XposCtx,
        Field::Score,
        Field::Lock,
    ];

    /// Zero-based column index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as written in `global.columns` headers.
    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Form => "form",
            Field::Lemma => "lemma",
            Field::Upos => "upos",
            Field::Xpos => "xpos",
            Field::Feats => "feats",
            Field::Head => "head",
            Field::Deprel => "deprel",
            Field::Deps => "deps",
            Field::Misc => "misc",
            Field::Eng => "eng",
            Field::Norm => "norm",
            Field::Lang => "lang",
            Field::FormCtx => "formctx",
            Field::XposCtx => "xposctx",
            Field::Score => "score",
            Field::Lock => "lock",
        }
    }

    /// Fields holding derived context windows, scrubbed before the final write.
    pub fn is_transient(self) -> bool {
        matches!(self, Field::FormCtx | Field::XposCtx)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ConlluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConlluError::UnknownField(s.to_string()))
    }
}
