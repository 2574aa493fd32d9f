//! Per-grid orchestrator.
//!
//! One controller owns a table's interaction state (selection, editing,
//! drag) and talks to the shared clipboard store. The host's render layer
//! calls in with raw coordinates and key events, and reads state back either
//! as typed values or wholesale as one JSON document.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde_json::json;

use marksheet_core::coord::SelPos;
use marksheet_core::range::{resolve, Classification, RangeRect, ResolvedRange};
use marksheet_core::selection::SelectionState;

use crate::clipboard;
use crate::clipboard_store::{ClipboardStore, GridOwner};
use crate::drag::{moved_block_start, DragKind, DragMoveEngine, MoveResult};
use crate::editing::EditState;
use crate::filter::RowFilterView;
use crate::navigation::{self, NavContext, NavKey};
use crate::settings::EngineSettings;
use crate::table::Table;

pub struct GridController {
    owner: GridOwner,
    pub table: Table,
    selection: SelectionState,
    edit: EditState,
    drag: DragMoveEngine,
    filters: RowFilterView,
    clipboard: Rc<RefCell<ClipboardStore>>,
    settings: EngineSettings,
    /// Pointer-down position, pending the drag movement threshold.
    pointer_origin: Option<(f32, f32)>,
}

impl GridController {
    pub fn new(
        owner: GridOwner,
        table: Table,
        clipboard: Rc<RefCell<ClipboardStore>>,
        settings: EngineSettings,
    ) -> Self {
        let mut filters = RowFilterView::new();
        filters.recompute(&table.rows);
        Self {
            owner,
            table,
            selection: SelectionState::default(),
            edit: EditState::new(),
            drag: DragMoveEngine::new(),
            filters,
            clipboard,
            settings,
            pointer_origin: None,
        }
    }

    pub fn owner(&self) -> GridOwner {
        self.owner
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn filters_mut(&mut self) -> &mut RowFilterView {
        &mut self.filters
    }

    /// Re-evaluate filters after row data changed.
    pub fn refresh_filters(&mut self) {
        self.filters.recompute(&self.table.rows);
    }

    /// The current selection resolved against the table's size.
    pub fn resolved_selection(&self) -> Option<ResolvedRange> {
        resolve(&self.selection, self.table.row_count(), self.table.col_count())
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Pointer-down at a decoded grid position. `extend` is shift-click.
    pub fn pointer_down(&mut self, raw_row: i32, raw_col: i32, x: f32, y: f32, extend: bool) {
        let Some(pos) = SelPos::decode(raw_row, raw_col) else {
            return;
        };
        if extend {
            self.selection.extend(pos);
        } else {
            self.selection.point(pos);
        }
        self.pointer_origin = Some((x, y));
    }

    /// Pointer movement. Starts the selection drag once the movement
    /// threshold is exceeded, then tracks the pointer mode-aware.
    pub fn pointer_moved(&mut self, raw_row: i32, raw_col: i32, x: f32, y: f32) {
        if let Some((ox, oy)) = self.pointer_origin {
            if !self.selection.is_dragging() {
                let dist = ((x - ox).powi(2) + (y - oy).powi(2)).sqrt();
                if dist > self.settings.drag_move_threshold {
                    self.selection.set_dragging(true);
                }
            }
        }
        if let Some(pos) = SelPos::decode(raw_row, raw_col) {
            self.selection.drag_update(pos);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_origin = None;
        self.selection.set_dragging(false);
    }

    // =========================================================================
    // Keyboard input
    // =========================================================================

    pub fn handle_key(&mut self, key: NavKey, shift: bool) {
        if self.edit.is_editing() {
            return;
        }
        let ctx = NavContext {
            row_count: self.table.row_count(),
            col_count: self.table.col_count(),
            ghost_row: self.settings.ghost_row,
            visibility: &self.filters,
        };
        navigation::handle_key(&mut self.selection, key, shift, &ctx);
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Begin editing the cursor cell (or header label). In replacement mode
    /// the edit starts from `typed` instead of the existing value.
    pub fn begin_edit(&mut self, typed: Option<&str>) {
        let replacement = typed.is_some();
        let initial = match (typed, self.selection.cursor()) {
            (Some(t), _) => t.to_string(),
            (None, SelPos::Cell { row, col }) => self.table.cell(row, col).to_string(),
            (None, SelPos::HeaderLabel { col }) => self
                .table
                .headers
                .get(col)
                .cloned()
                .unwrap_or_default(),
            _ => return,
        };
        self.edit.start_editing(&initial, replacement);
    }

    pub fn set_pending_value(&mut self, value: &str) {
        self.edit.set_pending_value(value);
    }

    /// Commit the edit into the table: cell text, header label, or a fresh
    /// row appended when committing on the ghost row.
    pub fn commit_edit(&mut self) {
        let Some(value) = self.edit.commit() else {
            return;
        };
        match self.selection.cursor() {
            SelPos::Cell { row, col } => {
                if row == self.table.row_count() && self.settings.ghost_row {
                    self.insert_rows(row, 1);
                }
                self.table.update_cell(row, col, &value);
            }
            SelPos::HeaderLabel { col } => {
                if let Some(header) = self.table.headers.get_mut(col) {
                    *header = value;
                }
            }
            _ => {}
        }
        self.refresh_filters();
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Copy the resolved selection: stores the shared snapshot and returns
    /// the TSV text for the host to place on the OS clipboard.
    pub fn copy(&mut self) -> Option<String> {
        let resolved = self.resolved_selection()?;
        let payload = clipboard::extract_payload(&resolved, &self.table.headers, &self.table.rows);
        // Select-all payloads carry the header row, so they adjust like
        // column snapshots.
        let kind = match resolved.kind {
            Classification::All => Classification::Columns,
            other => other,
        };
        self.clipboard
            .borrow_mut()
            .set_copied(self.owner, payload.clone(), kind, resolved.rect);
        Some(clipboard::serialize(&payload))
    }

    /// Cut: copy, blank the source cells, and drop the snapshot (a cut
    /// leaves no copied-range indicator behind).
    pub fn cut(&mut self) -> Option<String> {
        let resolved = self.resolved_selection()?;
        let text = self.copy()?;
        let rect = resolved.rect;
        for row in rect.min_row..=rect.max_row.min(self.table.row_count().saturating_sub(1)) {
            for col in rect.min_col..=rect.max_col {
                self.table.update_cell(row, col, "");
            }
        }
        self.clipboard.borrow_mut().clear();
        self.refresh_filters();
        Some(text)
    }

    /// Clear the shared indicator, but only if this grid owns it.
    pub fn clear_copied_range(&mut self) {
        self.clipboard.borrow_mut().clear_if_owner(self.owner);
    }

    /// Paste TSV text at the selection's paste target. Returns the rectangle
    /// the paste covered.
    pub fn paste(&mut self, text: &str) -> Option<RangeRect> {
        let block = clipboard::parse(text);
        if block.is_empty() {
            return None;
        }
        let (start_row, start_col) = clipboard::paste_target(
            &self.selection,
            self.table.row_count(),
            self.table.col_count(),
        );
        let height = block.len();
        let width = block.iter().map(|r| r.len()).max().unwrap_or(1);
        self.table.paste_block(start_row, start_col, &block);
        self.refresh_filters();
        Some(RangeRect::new(
            start_row,
            start_col,
            start_row + height - 1,
            start_col + width - 1,
        ))
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    pub fn insert_rows(&mut self, at: usize, count: usize) {
        for _ in 0..count {
            self.table.insert_row(at);
        }
        self.clipboard
            .borrow_mut()
            .adjust_for_row_insert(self.owner, at, count);
        self.refresh_filters();
    }

    pub fn delete_rows(&mut self, at: usize, count: usize) {
        let indices: Vec<usize> = (at..at + count).collect();
        self.table.delete_rows(&indices);
        self.clipboard
            .borrow_mut()
            .adjust_for_row_delete(self.owner, at, count);
        self.refresh_filters();
    }

    pub fn insert_cols(&mut self, at: usize, count: usize) {
        for offset in 0..count {
            let name = format!("Column {}", self.table.col_count() + 1);
            self.table.insert_column(at + offset, &name);
        }
        self.clipboard
            .borrow_mut()
            .adjust_for_col_insert(self.owner, at, count);
    }

    pub fn delete_cols(&mut self, at: usize, count: usize) {
        let indices: Vec<usize> = (at..at + count).collect();
        self.table.delete_columns(&indices);
        self.clipboard
            .borrow_mut()
            .adjust_for_col_delete(self.owner, at, count);
    }

    // =========================================================================
    // Drag moves
    // =========================================================================

    /// Begin moving the resolved selection as rows, columns, or a cell block.
    pub fn begin_move(&mut self, kind: DragKind) {
        if let Some(resolved) = self.resolved_selection() {
            self.drag.start_drag(kind, resolved.rect);
        }
    }

    pub fn update_move_target(&mut self, index: usize) {
        self.drag.update_drop_target(index);
    }

    pub fn update_cell_move_target(&mut self, row: usize, col: usize) {
        self.drag.update_cell_drop_target(row, col);
    }

    pub fn cancel_move(&mut self) {
        self.drag.cancel_drag();
    }

    /// Complete the drag and apply the move to the table. The selection
    /// follows the moved block. `None` means no move was performed.
    pub fn complete_move(&mut self) -> Option<MoveResult> {
        let result = self.drag.complete_drag()?;
        match &result {
            MoveResult::Rows {
                source_indices,
                target_index,
            } => {
                self.table.move_rows(source_indices, *target_index);
                let start =
                    moved_block_start(*target_index, source_indices[0], source_indices.len());
                let end = start + source_indices.len() - 1;
                self.selection.point(SelPos::RowAll { row: start });
                self.selection.extend(SelPos::RowAll { row: end });
            }
            MoveResult::Cols {
                source_indices,
                target_index,
            } => {
                self.table.move_columns(source_indices, *target_index);
                let start =
                    moved_block_start(*target_index, source_indices[0], source_indices.len());
                let end = start + source_indices.len() - 1;
                self.selection.point(SelPos::ColAll { col: start });
                self.selection.extend(SelPos::ColAll { col: end });
            }
            MoveResult::Cell {
                source,
                dest_row,
                dest_col,
            } => {
                self.move_cell_block(*source, *dest_row, *dest_col);
                let end_row = dest_row + source.row_span() - 1;
                let end_col = dest_col + source.col_span() - 1;
                self.selection.point(SelPos::Cell {
                    row: *dest_row,
                    col: *dest_col,
                });
                self.selection.extend(SelPos::Cell {
                    row: end_row,
                    col: end_col,
                });
            }
        }
        self.refresh_filters();
        debug!("move applied: {:?}", result);
        Some(result)
    }

    /// Cut the source block and paste it at the destination. Reads the
    /// source up front so overlapping moves stay correct.
    fn move_cell_block(&mut self, source: RangeRect, dest_row: usize, dest_col: usize) {
        let block: Vec<Vec<String>> = (source.min_row..=source.max_row)
            .map(|r| {
                (source.min_col..=source.max_col)
                    .map(|c| self.table.cell(r, c).to_string())
                    .collect()
            })
            .collect();
        for row in source.min_row..=source.max_row {
            for col in source.min_col..=source.max_col {
                self.table.update_cell(row, col, "");
            }
        }
        self.table.paste_block(dest_row, dest_col, &block);
    }

    // =========================================================================
    // State export
    // =========================================================================

    /// The full interaction state as one JSON document for the host.
    pub fn state_json(&self) -> String {
        let doc = json!({
            "owner": self.owner,
            "selection": self.selection,
            "range": self.resolved_selection(),
            "edit": self.edit,
            "copiedRange": self.clipboard.borrow().snapshot().map(|s| s.range),
            "rowCount": self.table.row_count(),
            "colCount": self.table.col_count(),
        });
        doc.to_string()
    }
}
