use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::{AnnotationUnit, Field};

/// Column-aligned view of one unit, for logs and snapshot tests.
///
/// ```text
/// form      lemma   xpos  score
/// a-na      ana     PRP   3.0
/// {d}UTU    šamaš   DN    0.0
/// ```
pub struct UnitDisplay<'a> {
    unit: &'a AnnotationUnit,
    fields: Vec<Field>,
    show_comments: bool,
}

impl<'a> UnitDisplay<'a> {
    pub fn new(unit: &'a AnnotationUnit) -> Self {
        Self {
            unit,
            fields: Vec::new(),
            show_comments: false,
        }
    }

    /// Add a column. Columns appear in the order they are included.
    pub fn include(mut self, field: Field) -> Self {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    pub fn with_comments(mut self) -> Self {
        self.show_comments = true;
        self
    }

    fn columns(&self) -> Vec<Field> {
        if self.fields.is_empty() {
            vec![Field::Form, Field::Lemma, Field::Xpos]
        } else {
            self.fields.clone()
        }
    }
}

impl<'a> std::fmt::Display for UnitDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let columns = self.columns();

        let mut widths: Vec<usize> = columns
            .iter()
            .map(|field| UnicodeWidthStr::width(field.name()))
            .collect();
        for token in &self.unit.tokens {
            for (width, field) in widths.iter_mut().zip(&columns) {
                *width = (*width).max(UnicodeWidthStr::width(token.get(*field)));
            }
        }

        if self.show_comments {
            for comment in &self.unit.comments {
                f.write_str(comment)?;
                f.write_char('\n')?;
            }
        }

        let header = columns.iter().map(|field| field.name());
        write_row(f, header, &widths, SPACE_PADDING)?;
        for token in &self.unit.tokens {
            f.write_char('\n')?;
            write_row(f, columns.iter().map(|field| token.get(*field)), &widths, SPACE_PADDING)?;
        }
        Ok(())
    }
}

fn write_row<'s>(
    f: &mut std::fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'s str>,
    widths: &[usize],
    padding: usize,
) -> std::fmt::Result {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.zip(widths).enumerate() {
        if idx > 0 {
            line.extend(std::iter::repeat(' ').take(padding));
        }
        line.push_str(cell);
        let fill = width - UnicodeWidthStr::width(cell);
        line.extend(std::iter::repeat(' ').take(fill));
    }
    // no trailing padding on the last column
    f.write_str(line.trim_end())
}
