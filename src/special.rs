//! Classifier for structurally determined tokens.
//!
//! Numerals and lacunae get their analysis from their shape, not from the
//! predictor, so they are marked and excluded from confidence scoring.

use once_cell::sync::Lazy;
use regex::Regex;

/// Numbers like `3`, `1/2`, `2(diš)`, `5(u)` and the unknown count `n(diš)`.
static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:/\d+)?(?:\([^()\s]+\))?|n\([^()\s]+\))$")
        .expect("numeral pattern is valid")
});

/// Characters that decorate a damaged sign without being part of it.
const LACUNA_META: &[char] = &['[', ']', '⸢', '⸣', '<', '>', '(', ')', '!', '?'];

/// Sign delimiters inside a transliterated word.
const DELIMITERS: &[char] = &['-', '.', ' ', ':', '{', '}'];

/// The lacuna sign.
const LACUNA_SIGN: char = 'x';

/// Category of a structurally determined token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialCategory {
    Numeral,
    Lacuna,
}

impl SpecialCategory {
    pub const ALL: [SpecialCategory; 2] = [SpecialCategory::Numeral, SpecialCategory::Lacuna];

    /// Label stored in the misc column as `special=<label>`.
    pub fn label(self) -> &'static str {
        match self {
            SpecialCategory::Numeral => "numeral",
            SpecialCategory::Lacuna => "lacuna",
        }
    }

    /// Tag forced onto tokens of this category.
    pub fn tag_sentinel(self) -> &'static str {
        match self {
            SpecialCategory::Numeral => "n",
            SpecialCategory::Lacuna => "u",
        }
    }

    /// The full misc entry, e.g. `special=numeral`.
    pub fn misc_entry(self) -> String {
        format!("{}{}", MISC_KEY, self.label())
    }

    pub fn matches(self, form: &str) -> bool {
        match self {
            SpecialCategory::Numeral => NUMERAL.is_match(form),
            SpecialCategory::Lacuna => is_lacuna(form),
        }
    }

    /// First category whose pattern matches `form`.
    pub fn classify(form: &str) -> Option<SpecialCategory> {
        SpecialCategory::ALL
            .iter()
            .copied()
            .find(|category| category.matches(form))
    }
}

/// Key prefix of the misc entry written by `unlemmatize_special`.
pub const MISC_KEY: &str = "special=";

/// True when a misc column records a special category.
pub fn has_special_marker(misc: &str) -> bool {
    misc.split('|').any(|entry| entry.starts_with(MISC_KEY))
}

/// True when the form contains a lacuna sign anywhere (partially broken word).
pub fn has_lacuna_sign(form: &str) -> bool {
    form.contains(LACUNA_SIGN)
}

/// True when the form consists of nothing but broken signs or ellipses.
fn is_lacuna(form: &str) -> bool {
    let signs: String = form
        .chars()
        .filter(|c| !LACUNA_META.contains(c) && !DELIMITERS.contains(c))
        .collect();
    if signs.is_empty() {
        return form.contains("...") || form.contains('…');
    }
    signs.chars().all(|c| c == LACUNA_SIGN || c == '…')
}
