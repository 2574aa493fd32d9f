//! Row, column, and cell-block drag moves.
//!
//! An explicit state machine advanced by the host's pointer events. Each
//! `Dragging` variant carries only the drop-target field that makes sense for
//! its kind, so a cell target on a row drag is unrepresentable. The drag is
//! consumed exactly once by `complete_drag`, which resets to `Idle` whether
//! or not a move was produced.

use log::debug;

use marksheet_core::range::RangeRect;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Row,
    Col,
    Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Rows {
        source: (usize, usize),
        target: Option<usize>,
    },
    Cols {
        source: (usize, usize),
        target: Option<usize>,
    },
    Block {
        source: RangeRect,
        target: Option<(usize, usize)>,
    },
}

/// A completed move, handed to the persistence layer as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Rows {
        /// Contiguous source indices, ascending.
        source_indices: Vec<usize>,
        /// Insertion index in the pre-removal list.
        target_index: usize,
    },
    Cols {
        source_indices: Vec<usize>,
        target_index: usize,
    },
    Cell {
        source: RangeRect,
        dest_row: usize,
        dest_col: usize,
    },
}

#[derive(Debug, Default)]
pub struct DragMoveEngine {
    state: DragState,
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragMoveEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Capture the source rectangle and enter `Dragging`. Row/col kinds take
    /// their index span from the matching axis of `source`. Starting over an
    /// unfinished drag discards the stale one (a drag whose terminating
    /// pointer-up was lost must be restartable).
    pub fn start_drag(&mut self, kind: DragKind, source: RangeRect) {
        if self.is_dragging() {
            debug!("drag started while already dragging; discarding stale drag");
        }
        self.state = match kind {
            DragKind::Row => DragState::Rows {
                source: (source.min_row, source.max_row),
                target: None,
            },
            DragKind::Col => DragState::Cols {
                source: (source.min_col, source.max_col),
                target: None,
            },
            DragKind::Cell => DragState::Block {
                source,
                target: None,
            },
        };
    }

    /// Record a tentative insertion index for a row/col drag. Repeated calls
    /// overwrite; no-op for cell drags and when idle.
    pub fn update_drop_target(&mut self, index: usize) {
        match &mut self.state {
            DragState::Rows { target, .. } | DragState::Cols { target, .. } => {
                *target = Some(index);
            }
            _ => {}
        }
    }

    /// Record a tentative destination for a cell-block drag. No-op for
    /// row/col drags and when idle.
    pub fn update_cell_drop_target(&mut self, row: usize, col: usize) {
        if let DragState::Block { target, .. } = &mut self.state {
            *target = Some((row, col));
        }
    }

    /// Whether the current drop target would produce an actual move.
    ///
    /// For row/col drags every insertion index inside `[min, max+1]` is
    /// invalid (the block would land where it already is); for cell drags
    /// only dropping on the source's own top-left is invalid. False whenever
    /// no target has been recorded.
    pub fn is_drop_target_valid(&self) -> bool {
        match self.state {
            DragState::Idle => false,
            DragState::Rows {
                source: (min, max),
                target,
            }
            | DragState::Cols {
                source: (min, max),
                target,
            } => match target {
                Some(index) => index < min || index > max + 1,
                None => false,
            },
            DragState::Block { source, target } => match target {
                Some((row, col)) => (row, col) != (source.min_row, source.min_col),
                None => false,
            },
        }
    }

    /// Consume the drag. Returns `None` (no move performed) when idle, when
    /// no target was ever recorded, or when the target is invalid. Always
    /// resets to `Idle`.
    pub fn complete_drag(&mut self) -> Option<MoveResult> {
        let valid = self.is_drop_target_valid();
        let state = std::mem::take(&mut self.state);
        if !valid {
            return None;
        }
        match state {
            DragState::Idle => None,
            DragState::Rows {
                source: (min, max),
                target,
            } => Some(MoveResult::Rows {
                source_indices: (min..=max).collect(),
                target_index: target?,
            }),
            DragState::Cols {
                source: (min, max),
                target,
            } => Some(MoveResult::Cols {
                source_indices: (min..=max).collect(),
                target_index: target?,
            }),
            DragState::Block { source, target } => {
                let (dest_row, dest_col) = target?;
                Some(MoveResult::Cell {
                    source,
                    dest_row,
                    dest_col,
                })
            }
        }
    }

    /// Tear the drag down without producing a result (escape key, invalid
    /// pointer-up, host disconnect). Observers are not notified.
    pub fn cancel_drag(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Where a moved row/col block starts after the move: the insertion index
/// itself when the block moved up/left, otherwise the index minus the block
/// length (the block's own slots vacated ahead of the insertion point).
pub fn moved_block_start(target_index: usize, source_min: usize, block_len: usize) -> usize {
    if target_index <= source_min {
        target_index
    } else {
        target_index - block_len
    }
}
