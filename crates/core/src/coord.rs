//! Selection coordinates.
//!
//! The host delivers pointer and key targets as raw `(i32, i32)` pairs using
//! sentinel values for the non-cell surfaces of the grid (header labels, the
//! row/column header bands, the select-all corner). Internally every position
//! is decoded into [`SelPos`] so that each surface is its own variant and the
//! sentinel arithmetic lives in exactly one place.

use serde::{Deserialize, Serialize};

/// Raw row value for the header-label pseudo-row (editing a column's title).
pub const HEADER_LABEL_ROW: i32 = -1;

/// Raw value marking a whole-band selection on either axis:
/// `row == BAND` selects an entire column, `col == BAND` an entire row,
/// both together the select-all corner.
pub const BAND: i32 = -2;

/// A decoded position on the grid surface.
///
/// The ghost append row is not a separate variant: it is `Cell` with
/// `row == row_count`, distinguishable only against the current grid size
/// (see [`SelPos::is_ghost`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelPos {
    /// An ordinary data cell. `row` may equal the row count (ghost row).
    Cell { row: usize, col: usize },
    /// The label of column `col` (header text editing).
    HeaderLabel { col: usize },
    /// Whole-row mode anchored at `row`.
    RowAll { row: usize },
    /// Whole-column mode anchored at `col`.
    ColAll { col: usize },
    /// The select-all corner.
    All,
}

impl SelPos {
    /// Decode a raw coordinate pair. Returns `None` for combinations the
    /// sentinel encoding cannot produce (e.g. a header label in band mode).
    pub fn decode(row: i32, col: i32) -> Option<SelPos> {
        match (row, col) {
            (BAND, BAND) => Some(SelPos::All),
            (BAND, c) if c >= 0 => Some(SelPos::ColAll { col: c as usize }),
            (r, BAND) if r >= 0 => Some(SelPos::RowAll { row: r as usize }),
            (HEADER_LABEL_ROW, c) if c >= 0 => Some(SelPos::HeaderLabel { col: c as usize }),
            (r, c) if r >= 0 && c >= 0 => Some(SelPos::Cell {
                row: r as usize,
                col: c as usize,
            }),
            _ => None,
        }
    }

    /// Re-encode into the raw sentinel pair. Exact inverse of [`decode`].
    ///
    /// [`decode`]: SelPos::decode
    pub fn encode(self) -> (i32, i32) {
        match self {
            SelPos::Cell { row, col } => (row as i32, col as i32),
            SelPos::HeaderLabel { col } => (HEADER_LABEL_ROW, col as i32),
            SelPos::RowAll { row } => (row as i32, BAND),
            SelPos::ColAll { col } => (BAND, col as i32),
            SelPos::All => (BAND, BAND),
        }
    }

    /// The data-row component, where one exists.
    pub fn row(self) -> Option<usize> {
        match self {
            SelPos::Cell { row, .. } | SelPos::RowAll { row } => Some(row),
            _ => None,
        }
    }

    /// The column component, where one exists.
    pub fn col(self) -> Option<usize> {
        match self {
            SelPos::Cell { col, .. } | SelPos::HeaderLabel { col } | SelPos::ColAll { col } => {
                Some(col)
            }
            _ => None,
        }
    }

    /// True for the virtual append row one past the last data row.
    pub fn is_ghost(self, row_count: usize) -> bool {
        matches!(self, SelPos::Cell { row, .. } if row == row_count)
    }

    /// True for whole-row mode (`RowAll`).
    pub fn is_row_band(self) -> bool {
        matches!(self, SelPos::RowAll { .. })
    }

    /// True for whole-column mode (`ColAll`).
    pub fn is_col_band(self) -> bool {
        matches!(self, SelPos::ColAll { .. })
    }
}
