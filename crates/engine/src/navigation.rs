//! Keyboard navigation.
//!
//! Arrow keys move or (with shift) extend the selection; Tab and Enter step
//! sideways/downwards and never extend; shift only reverses their direction.
//! Row movement goes through the injected [`RowVisibility`] so
//! filtered-out rows are skipped. Coordinates clamp to the grid plus the
//! ghost append row; only a Shift-Tab wrap can climb into the header
//! pseudo-row.

use marksheet_core::coord::SelPos;
use marksheet_core::selection::SelectionState;

use crate::filter::RowVisibility;

/// Keys this engine handles. Shift is passed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
}

/// Grid dimensions and services navigation needs for one keystroke.
pub struct NavContext<'a> {
    pub row_count: usize,
    pub col_count: usize,
    /// Whether the virtual append row is reachable.
    pub ghost_row: bool,
    pub visibility: &'a dyn RowVisibility,
}

impl<'a> NavContext<'a> {
    /// Largest reachable row index (the ghost row when enabled).
    fn max_row(&self) -> i64 {
        if self.ghost_row {
            self.row_count as i64
        } else {
            (self.row_count as i64 - 1).max(0)
        }
    }

    fn last_col(&self) -> i64 {
        (self.col_count as i64 - 1).max(0)
    }
}

/// Current cursor as signed (row, col), header pseudo-row as -1. Band
/// cursors fall back to the edge of their band.
fn cursor_coords(cursor: SelPos) -> (i64, i64) {
    match cursor {
        SelPos::Cell { row, col } => (row as i64, col as i64),
        SelPos::HeaderLabel { col } => (-1, col as i64),
        SelPos::RowAll { row } => (row as i64, 0),
        SelPos::ColAll { col } => (0, col as i64),
        SelPos::All => (0, 0),
    }
}

fn encode(row: i64, col: i64) -> SelPos {
    if row < 0 {
        SelPos::HeaderLabel { col: col.max(0) as usize }
    } else {
        SelPos::Cell {
            row: row as usize,
            col: col.max(0) as usize,
        }
    }
}

/// Apply one keystroke to the selection.
pub fn handle_key(sel: &mut SelectionState, key: NavKey, shift: bool, ctx: &NavContext) {
    let (row, col) = cursor_coords(sel.cursor());
    let vis = ctx.visibility;

    let (mut new_row, mut new_col) = match key {
        NavKey::Up => (vis.next_visible_row(row, -1), col),
        NavKey::Down => (vis.next_visible_row(row, 1), col),
        NavKey::Left => (row, col - 1),
        NavKey::Right => (row, col + 1),
        NavKey::Enter => {
            let delta = if shift { -1 } else { 1 };
            (vis.next_visible_row(row, delta), col)
        }
        NavKey::Tab => {
            if !shift && col == ctx.last_col() {
                // Wrap to the start of the next row.
                (vis.next_visible_row(row, 1), 0)
            } else if shift && col == 0 {
                // Wrap to the end of the previous row; this is the only path
                // that may climb into the header pseudo-row.
                let wrapped = vis.next_visible_row(row, -1).max(-1);
                sel.point(encode(wrapped.min(ctx.max_row()), ctx.last_col()));
                return;
            } else if shift {
                (row, col - 1)
            } else {
                (row, col + 1)
            }
        }
    };

    new_row = new_row.clamp(0, ctx.max_row());
    new_col = new_col.clamp(0, ctx.last_col());
    let pos = encode(new_row, new_col);

    let extends = shift && matches!(key, NavKey::Up | NavKey::Down | NavKey::Left | NavKey::Right);
    if extends {
        sel.extend(pos);
    } else {
        sel.point(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AllVisible, RowFilterView};

    fn ctx(row_count: usize, col_count: usize) -> NavContext<'static> {
        NavContext {
            row_count,
            col_count,
            ghost_row: true,
            visibility: &AllVisible,
        }
    }

    #[test]
    fn test_arrow_moves_and_collapses() {
        let mut sel = SelectionState::at(1, 1);
        handle_key(&mut sel, NavKey::Down, false, &ctx(5, 5));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 2, col: 1 });
        assert_eq!(sel.anchor(), Some(SelPos::Cell { row: 2, col: 1 }));
    }

    #[test]
    fn test_shift_arrow_extends() {
        let mut sel = SelectionState::at(1, 1);
        handle_key(&mut sel, NavKey::Right, true, &ctx(5, 5));
        handle_key(&mut sel, NavKey::Down, true, &ctx(5, 5));
        assert_eq!(sel.anchor(), Some(SelPos::Cell { row: 1, col: 1 }));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 2, col: 2 });
    }

    #[test]
    fn test_shift_enter_reverses_but_never_extends() {
        let mut sel = SelectionState::at(2, 1);
        handle_key(&mut sel, NavKey::Enter, true, &ctx(5, 5));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 1, col: 1 });
        // Point semantics: anchor follows.
        assert_eq!(sel.anchor(), Some(SelPos::Cell { row: 1, col: 1 }));
    }

    #[test]
    fn test_clamp_at_edges() {
        let mut sel = SelectionState::at(0, 0);
        handle_key(&mut sel, NavKey::Up, false, &ctx(3, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 0, col: 0 });
        handle_key(&mut sel, NavKey::Left, false, &ctx(3, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 0, col: 0 });
    }

    #[test]
    fn test_down_reaches_ghost_row_then_stops() {
        let mut sel = SelectionState::at(2, 0);
        let c = ctx(3, 2);
        handle_key(&mut sel, NavKey::Down, false, &c);
        assert_eq!(sel.cursor(), SelPos::Cell { row: 3, col: 0 });
        handle_key(&mut sel, NavKey::Down, false, &c);
        assert_eq!(sel.cursor(), SelPos::Cell { row: 3, col: 0 });
    }

    #[test]
    fn test_ghost_row_disabled() {
        let mut sel = SelectionState::at(2, 0);
        let c = NavContext {
            row_count: 3,
            col_count: 2,
            ghost_row: false,
            visibility: &AllVisible,
        };
        handle_key(&mut sel, NavKey::Down, false, &c);
        assert_eq!(sel.cursor(), SelPos::Cell { row: 2, col: 0 });
    }

    #[test]
    fn test_tab_wraps_to_next_row_start() {
        let mut sel = SelectionState::at(1, 2);
        handle_key(&mut sel, NavKey::Tab, false, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 2, col: 0 });
    }

    #[test]
    fn test_shift_tab_wraps_to_previous_row_end() {
        let mut sel = SelectionState::at(2, 0);
        handle_key(&mut sel, NavKey::Tab, true, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 1, col: 2 });
    }

    #[test]
    fn test_shift_tab_from_row_zero_reaches_header() {
        let mut sel = SelectionState::at(0, 0);
        handle_key(&mut sel, NavKey::Tab, true, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::HeaderLabel { col: 2 });
        // And it never drops below the header pseudo-row.
        let mut sel = SelectionState::default();
        sel.point(SelPos::HeaderLabel { col: 0 });
        handle_key(&mut sel, NavKey::Tab, true, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::HeaderLabel { col: 2 });
    }

    #[test]
    fn test_down_from_header_row_enters_grid() {
        let mut sel = SelectionState::default();
        sel.point(SelPos::HeaderLabel { col: 1 });
        handle_key(&mut sel, NavKey::Down, false, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 0, col: 1 });
    }

    #[test]
    fn test_row_movement_skips_filtered_rows() {
        let data: Vec<Vec<String>> = [["a"], ["b"], ["b"], ["a"]]
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        let mut view = RowFilterView::new();
        view.set_filter(0, ["a".to_string()]);
        view.recompute(&data);

        let c = NavContext {
            row_count: 4,
            col_count: 1,
            ghost_row: true,
            visibility: &view,
        };
        let mut sel = SelectionState::at(0, 0);
        handle_key(&mut sel, NavKey::Down, false, &c);
        assert_eq!(sel.cursor(), SelPos::Cell { row: 3, col: 0 });
        handle_key(&mut sel, NavKey::Up, false, &c);
        assert_eq!(sel.cursor(), SelPos::Cell { row: 0, col: 0 });
    }

    #[test]
    fn test_tab_never_extends_even_with_shift() {
        let mut sel = SelectionState::at(1, 1);
        handle_key(&mut sel, NavKey::Tab, true, &ctx(4, 3));
        assert_eq!(sel.cursor(), SelPos::Cell { row: 1, col: 0 });
        assert_eq!(sel.anchor(), Some(SelPos::Cell { row: 1, col: 0 }));
    }
}
