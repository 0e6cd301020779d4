//! Transliteration normalization seam.
//!
//! The document model does not own canonicalization rules; it calls a
//! [`Normalizer`] for every unlocked form and lemma.

/// A pure `string -> canonical string` function.
pub trait Normalizer {
    fn normalize(&self, text: &str) -> String;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// ASCII digraph spellings and their Unicode equivalents.
const DIGRAPHS: [(&str, &str); 4] = [("sz", "š"), ("SZ", "Š"), ("s,", "ṣ"), ("t,", "ṭ")];

const SUBSCRIPT_X: char = 'ₓ';

/// Default rules for Assyriological transliteration.
///
/// - ASCII digraphs: `sz` → `š`, `s,` → `ṣ`, `t,` → `ṭ`
/// - `ḫ` is written `h`
/// - sign indices written as digits become subscripts: `du3` → `du₃`
/// - determinatives inside `{}` are lower-cased, phonetic complements (`{+...}`) are left alone
#[derive(Debug, Clone, Copy, Default)]
pub struct TransliterationNormalizer;

impl Normalizer for TransliterationNormalizer {
    fn normalize(&self, text: &str) -> String {
        let mut xlit = text.replace('ḫ', "h").replace('Ḫ', "H");
        for (ascii, unicode) in DIGRAPHS.iter() {
            xlit = xlit.replace(ascii, unicode);
        }
        let xlit = subscribe_indices(&xlit);
        lowercase_determinatives(&xlit)
    }
}

fn subscript(digit: char) -> char {
    digit
        .to_digit(10)
        .and_then(|d| char::from_u32(0x2080 + d))
        .unwrap_or(digit)
}

/// Digits directly following a letter are sign indices; so are the digits
/// continuing such a run. `x` before `(` after a letter is the unknown index.
fn subscribe_indices(xlit: &str) -> String {
    let chars: Vec<char> = xlit.chars().collect();
    let mut out = String::with_capacity(xlit.len());
    let mut last: Option<char> = None;
    let mut in_index = false;

    for (idx, &c) in chars.iter().enumerate() {
        let after_letter = last.map_or(false, |l| l.is_alphabetic());
        let next = chars.get(idx + 1).copied();
        let c = if c.is_ascii_digit() && (after_letter || in_index) {
            in_index = true;
            subscript(c)
        } else if c == 'x' && next == Some('(') && after_letter {
            SUBSCRIPT_X
        } else {
            in_index = false;
            c
        };
        out.push(c);
        last = Some(c);
    }
    out
}

fn lowercase_determinatives(xlit: &str) -> String {
    let mut out = String::with_capacity(xlit.len());
    let mut in_determinative = false;
    let mut previous = None;

    for c in xlit.chars() {
        match c {
            '{' => in_determinative = true,
            '}' => in_determinative = false,
            '+' if previous == Some('{') => in_determinative = false,
            _ => {}
        }
        if in_determinative {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}
