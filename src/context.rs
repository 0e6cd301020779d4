//! Fixed-size neighbour windows over one annotation unit.
//!
//! A unit of `L` values is padded with `k` start sentinels and `k` end
//! sentinels; each real value then anchors exactly one window of `2k + 1`
//! entries. Windows never cross a unit boundary and a sentinel is never the
//! anchor.

use std::fmt;

/// Sentinel filling positions before the first token of a unit.
pub const START_OF_UNIT: &str = "<SOU>";

/// Sentinel filling positions after the last token of a unit.
pub const END_OF_UNIT: &str = "<EOU>";

/// Separator used when a window is stored in a context column.
pub const WINDOW_SEPARATOR: &str = "|";

/// One window of `2k + 1` values centred on a real token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow<'a> {
    parts: Vec<&'a str>,
    half_window: usize,
}

impl<'a> ContextWindow<'a> {
    pub fn parts(&self) -> &[&'a str] {
        &self.parts
    }

    pub fn half_window(&self) -> usize {
        self.half_window
    }

    /// The value of the token this window belongs to.
    pub fn anchor(&self) -> &'a str {
        self.parts[self.half_window]
    }

    /// The `k` entries before the anchor.
    pub fn left(&self) -> &[&'a str] {
        &self.parts[..self.half_window]
    }

    /// The `k` entries after the anchor.
    pub fn right(&self) -> &[&'a str] {
        &self.parts[self.half_window + 1..]
    }

    /// Pipe-joined form stored in `formctx` / `xposctx`.
    pub fn joined(&self) -> String {
        self.parts.join(WINDOW_SEPARATOR)
    }
}

impl fmt::Display for ContextWindow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Iterator over the windows of one unit, one per real token.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    padded: Vec<&'a str>,
    half_window: usize,
    position: usize,
    len: usize,
}

/// Build the windows for one unit's values.
pub fn windows<'a, I>(values: I, half_window: usize) -> Windows<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut padded: Vec<&'a str> = std::iter::repeat(START_OF_UNIT)
        .take(half_window)
        .collect();
    padded.extend(values);
    let len = padded.len() - half_window;
    padded.extend(std::iter::repeat(END_OF_UNIT).take(half_window));

    Windows {
        padded,
        half_window,
        position: 0,
        len,
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = ContextWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.len {
            return None;
        }
        let start = self.position;
        let end = start + 2 * self.half_window + 1;
        self.position += 1;
        Some(ContextWindow {
            parts: self.padded[start..end].to_vec(),
            half_window: self.half_window,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}
