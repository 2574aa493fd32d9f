//! Clipboard text codec and paste targeting.
//!
//! This module contains:
//! - TSV serialize/parse with RFC4180-style quoting
//! - Payload extraction for a resolved selection (headers prepended when the
//!   selection implicates the header row)
//! - Paste target resolution for the current selection
//!
//! The codec is pure: reading and writing the OS clipboard is the host's
//! responsibility.

use marksheet_core::coord::SelPos;
use marksheet_core::range::{resolve, Classification, ResolvedRange};
use marksheet_core::selection::SelectionState;

/// Serialize a cell grid to TSV: cells joined with `\t`, rows with `\n`.
/// Fields containing a tab, newline, carriage return, or quote are wrapped
/// in quotes with internal quotes doubled.
pub fn serialize(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_field(cell))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape a single field for TSV output.
fn escape_field(field: &str) -> String {
    if field.contains('\t') || field.contains('\n') || field.contains('\r') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse TSV text into a cell grid.
///
/// Single-pass scanner: outside quotes, `"` opens quoting, `\t` ends a field
/// and `\n` / `\r` / `\r\n` ends a row; inside quotes, `""` is a literal
/// quote and everything else accumulates. An unterminated quote is closed
/// implicitly at end of input. A trailing partial row is flushed only if it
/// accumulated content, so text without a final newline still yields its
/// last row and empty input yields no rows.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                '\t' => row.push(std::mem::take(&mut field)),
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    out.push(std::mem::take(&mut row));
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    out.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        out.push(row);
    }

    out
}

/// Build the copy payload for a resolved selection.
///
/// When the header row is implicated (`All` or `Columns`), one row of header
/// labels over the selected columns is prepended to the data rows. Cells
/// outside the table's actual extent come out empty.
pub fn extract_payload(
    range: &ResolvedRange,
    headers: &[String],
    rows: &[Vec<String>],
) -> Vec<Vec<String>> {
    let rect = range.rect;
    let mut payload = Vec::new();

    if matches!(range.kind, Classification::All | Classification::Columns) {
        payload.push(
            (rect.min_col..=rect.max_col)
                .map(|c| headers.get(c).cloned().unwrap_or_default())
                .collect(),
        );
    }

    for r in rect.min_row..=rect.max_row {
        if r >= rows.len() {
            break;
        }
        payload.push(
            (rect.min_col..=rect.max_col)
                .map(|c| rows[r].get(c).cloned().unwrap_or_default())
                .collect(),
        );
    }

    payload
}

/// Resolve where a paste lands for the current selection.
///
/// Corner pastes at (0,0); a column selection at row 0 of its leftmost
/// column; a row selection at column 0 of its topmost row; an ordinary range
/// at its top-left. A cursor parked on the ghost row appends at the current
/// row count.
pub fn paste_target(sel: &SelectionState, row_count: usize, col_count: usize) -> (usize, usize) {
    // Ghost check first: the resolver clamps to data bounds.
    if let SelPos::Cell { row, col } = sel.cursor() {
        if row == row_count {
            return (row_count, col);
        }
    }

    match resolve(sel, row_count, col_count) {
        Some(r) => match r.kind {
            Classification::All => (0, 0),
            Classification::Columns => (0, r.rect.min_col),
            Classification::Rows => (r.rect.min_row, 0),
            Classification::Cell => (r.rect.min_row, r.rect.min_col),
        },
        // Label edit: paste into the top of that column.
        None => (0, sel.cursor().col().unwrap_or(0)),
    }
}
