//! Range rectangles and selection resolution.

use serde::{Deserialize, Serialize};

use crate::coord::SelPos;
use crate::selection::SelectionState;

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRect {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl RangeRect {
    /// Create a new range, automatically normalizing so min <= max.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            min_row: r1.min(r2),
            max_row: r1.max(r2),
            min_col: c1.min(c2),
            max_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }

    /// Number of rows spanned.
    pub fn row_span(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Number of columns spanned.
    pub fn col_span(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.min_row == self.max_row && self.min_col == self.max_col
    }
}

/// Which selection mode a resolved range represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// An ordinary cell block (possibly a single cell).
    Cell,
    /// One or more whole rows.
    Rows,
    /// One or more whole columns.
    Columns,
    /// The full table via the select-all corner.
    All,
}

/// A resolved selection: its bounding rectangle and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub rect: RangeRect,
    pub kind: Classification,
}

/// Clamp a pair of endpoint indices to `[0, count-1]`, collapsing to `{0,0}`
/// on an empty axis so rectangles are never negative-width.
fn clamp_span(a: usize, b: usize, count: usize) -> (usize, usize) {
    let hi_bound = count.max(1) - 1;
    (a.min(b).min(hi_bound), a.max(b).min(hi_bound))
}

/// Resolve the current selection against the grid size.
///
/// Returns `None` for the degenerate no-selection case (a header-label
/// cursor selects no data cells). Mode priority: select-all, then row mode,
/// then column mode, then point/range.
pub fn resolve(sel: &SelectionState, row_count: usize, col_count: usize) -> Option<ResolvedRange> {
    let cursor = sel.cursor();
    let anchor = sel.anchor();

    // Select-all wins outright.
    if cursor == SelPos::All {
        let (min_row, max_row) = clamp_span(0, row_count.max(1) - 1, row_count);
        let (min_col, max_col) = clamp_span(0, col_count.max(1) - 1, col_count);
        return Some(ResolvedRange {
            rect: RangeRect {
                min_row,
                max_row,
                min_col,
                max_col,
            },
            kind: Classification::All,
        });
    }

    let anchor_is = |f: fn(SelPos) -> bool| anchor.map(f).unwrap_or(false);

    // Row mode: either endpoint sits in the row-header band.
    if cursor.is_row_band() || anchor_is(SelPos::is_row_band) {
        let cur_row = cursor.row().unwrap_or(0);
        let anc_row = anchor.and_then(SelPos::row).unwrap_or(cur_row);
        let (min_row, max_row) = clamp_span(cur_row, anc_row, row_count);
        let (min_col, max_col) = clamp_span(0, col_count.max(1) - 1, col_count);
        return Some(ResolvedRange {
            rect: RangeRect {
                min_row,
                max_row,
                min_col,
                max_col,
            },
            kind: Classification::Rows,
        });
    }

    // Column mode.
    if cursor.is_col_band() || anchor_is(SelPos::is_col_band) {
        let cur_col = cursor.col().unwrap_or(0);
        let anc_col = anchor.and_then(SelPos::col).unwrap_or(cur_col);
        let (min_col, max_col) = clamp_span(cur_col, anc_col, col_count);
        let (min_row, max_row) = clamp_span(0, row_count.max(1) - 1, row_count);
        return Some(ResolvedRange {
            rect: RangeRect {
                min_row,
                max_row,
                min_col,
                max_col,
            },
            kind: Classification::Columns,
        });
    }

    // A label edit selects no data cells.
    let (cur_row, cur_col) = match cursor {
        SelPos::Cell { row, col } => (row, col),
        _ => return None,
    };

    // Anchor endpoint, ignoring anchors that carry no data-cell position.
    let anchor_cell = match anchor {
        Some(SelPos::Cell { row, col }) => Some((row, col)),
        _ => None,
    };

    let rect = match anchor_cell {
        None => {
            let (r, _) = clamp_span(cur_row, cur_row, row_count);
            let (c, _) = clamp_span(cur_col, cur_col, col_count);
            RangeRect::single(r, c)
        }
        Some((anc_row, anc_col)) => {
            let (min_row, max_row) = clamp_span(cur_row, anc_row, row_count);
            let (min_col, max_col) = clamp_span(cur_col, anc_col, col_count);
            RangeRect {
                min_row,
                max_row,
                min_col,
                max_col,
            }
        }
    };

    Some(ResolvedRange {
        rect,
        kind: Classification::Cell,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_sel(row: usize, col: usize) -> SelectionState {
        SelectionState::at(row, col)
    }

    #[test]
    fn test_rect_normalizes() {
        let r = RangeRect::new(5, 5, 1, 1);
        assert_eq!(r.min_row, 1);
        assert_eq!(r.max_row, 5);
        assert_eq!(r.min_col, 1);
        assert_eq!(r.max_col, 5);
    }

    #[test]
    fn test_rect_contains() {
        let r = RangeRect::new(1, 1, 3, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(!r.contains(0, 0));
        assert!(!r.is_single());
    }

    #[test]
    fn test_resolve_select_all() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::All);
        let resolved = resolve(&sel, 2, 2).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(0, 0, 1, 1));
        assert_eq!(resolved.kind, Classification::All);
    }

    #[test]
    fn test_resolve_row_mode_spans_full_width() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::RowAll { row: 1 });
        let resolved = resolve(&sel, 2, 2).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(1, 0, 1, 1));
        assert_eq!(resolved.kind, Classification::Rows);
    }

    #[test]
    fn test_resolve_row_mode_extension() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::RowAll { row: 3 });
        sel.extend(SelPos::RowAll { row: 1 });
        let resolved = resolve(&sel, 5, 4).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(1, 0, 3, 3));
        assert_eq!(resolved.kind, Classification::Rows);
    }

    #[test]
    fn test_resolve_col_mode_spans_full_height() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::ColAll { col: 2 });
        sel.extend(SelPos::Cell { row: 4, col: 0 });
        let resolved = resolve(&sel, 6, 4).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(0, 0, 5, 2));
        assert_eq!(resolved.kind, Classification::Columns);
    }

    #[test]
    fn test_resolve_degenerate_point() {
        let mut sel = SelectionState::default();
        sel.extend(SelPos::Cell { row: 2, col: 1 });
        // Anchor was never set: single-point rectangle.
        let resolved = resolve(&sel, 5, 5).unwrap();
        assert_eq!(resolved.rect, RangeRect::single(2, 1));
        assert_eq!(resolved.kind, Classification::Cell);
    }

    #[test]
    fn test_resolve_ordinary_range() {
        let mut sel = point_sel(1, 1);
        sel.extend(SelPos::Cell { row: 3, col: 0 });
        let resolved = resolve(&sel, 5, 5).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(1, 0, 3, 1));
        assert_eq!(resolved.kind, Classification::Cell);
    }

    #[test]
    fn test_resolve_header_label_selects_nothing() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::HeaderLabel { col: 1 });
        assert!(resolve(&sel, 3, 3).is_none());
    }

    #[test]
    fn test_resolve_empty_grid_collapses_rows() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::RowAll { row: 0 });
        let resolved = resolve(&sel, 0, 3).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(0, 0, 0, 2));
    }

    #[test]
    fn test_resolve_clamps_out_of_range_rows() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::RowAll { row: 9 });
        let resolved = resolve(&sel, 4, 2).unwrap();
        assert_eq!(resolved.rect, RangeRect::new(3, 0, 3, 1));
    }

    #[test]
    fn test_resolve_bounds_hold_across_modes() {
        // Resolved rectangles stay inside [0, max(count,1)) on both axes.
        let positions = [
            SelPos::All,
            SelPos::RowAll { row: 7 },
            SelPos::ColAll { col: 7 },
            SelPos::Cell { row: 7, col: 7 },
        ];
        for rows in 0..4usize {
            for cols in 0..4usize {
                for pos in positions {
                    let mut sel = SelectionState::default();
                    sel.point(pos);
                    let resolved = resolve(&sel, rows, cols).unwrap();
                    assert!(resolved.rect.min_row <= resolved.rect.max_row);
                    assert!(resolved.rect.max_row < rows.max(1));
                    assert!(resolved.rect.min_col <= resolved.rect.max_col);
                    assert!(resolved.rect.max_col < cols.max(1));
                }
            }
        }
    }
}
