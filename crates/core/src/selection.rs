//! The selection model: a cursor, an optional anchor, and a drag flag.

use serde::{Deserialize, Serialize};

use crate::coord::SelPos;

/// Current selection: the moving cursor plus the anchor fixed when the
/// selection began. `anchor == None` means no range extension is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    cursor: SelPos,
    anchor: Option<SelPos>,
    dragging: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            cursor: SelPos::Cell { row: 0, col: 0 },
            anchor: None,
            dragging: false,
        }
    }
}

impl SelectionState {
    /// Selection at a single cell with the anchor planted there.
    pub fn at(row: usize, col: usize) -> Self {
        let pos = SelPos::Cell { row, col };
        Self {
            cursor: pos,
            anchor: Some(pos),
            dragging: false,
        }
    }

    pub fn cursor(&self) -> SelPos {
        self.cursor
    }

    pub fn anchor(&self) -> Option<SelPos> {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Fresh point selection: anchor and cursor both move to `pos`.
    /// Clears the drag flag.
    pub fn point(&mut self, pos: SelPos) {
        self.cursor = pos;
        self.anchor = Some(pos);
        self.dragging = false;
    }

    /// Extend from the anchor to `pos` (shift+click / shift+arrow): only the
    /// cursor moves. With no anchor set, the cursor still moves and the
    /// selection stays a degenerate point.
    pub fn extend(&mut self, pos: SelPos) {
        self.cursor = pos;
    }

    /// Mark a pointer drag as started or finished. The host flips this once
    /// its movement threshold is exceeded after pointer-down.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Mode-aware cursor update during an active pointer drag.
    ///
    /// In row mode only the row follows the pointer; in column mode only the
    /// column; in cell mode both. The cursor never lands on the header
    /// pseudo-row mid-drag: a pointer over a header label keeps the current
    /// row and follows the column only.
    pub fn drag_update(&mut self, pos: SelPos) {
        if !self.dragging {
            return;
        }
        self.cursor = match self.cursor {
            SelPos::RowAll { row } => SelPos::RowAll {
                row: pos.row().unwrap_or(row),
            },
            SelPos::ColAll { col } => SelPos::ColAll {
                col: pos.col().unwrap_or(col),
            },
            SelPos::Cell { row, col } => SelPos::Cell {
                row: pos.row().unwrap_or(row),
                col: pos.col().unwrap_or(col),
            },
            // Select-all and label editing don't track the pointer.
            other => other,
        };
    }

    /// Back to the default point selection at (0,0).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
