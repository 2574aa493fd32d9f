//! Table model and structural operations.
//!
//! A table is a named grid of text cells under a header row, the unit the
//! persistence layer edits when the engine hands it a move instruction or a
//! paste target. Cells ultimately live in GFM markdown tables, so raw `|`
//! characters are escaped on write.

use ordered_float::OrderedFloat;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Per-column presentation metadata, keyed by column index on the table.
/// Travels with its column through moves, inserts, and deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub width: Option<u32>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub columns_meta: FxHashMap<usize, ColumnMeta>,
}

impl Table {
    /// New table with the given headers and one empty data row.
    pub fn new(name: &str, headers: Vec<String>) -> Self {
        let empty_row = vec![String::new(); headers.len()];
        Self {
            name: name.to_string(),
            headers,
            rows: vec![empty_row],
            columns_meta: FxHashMap::default(),
        }
    }

    /// New table with explicit rows.
    pub fn from_rows(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
            columns_meta: FxHashMap::default(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell text; empty for anything out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write a cell, escaping raw pipes. Out-of-range writes are dropped.
    pub fn update_cell(&mut self, row: usize, col: usize, value: &str) {
        let escaped = escape_pipes(value);
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = escaped;
        }
    }

    /// Insert an empty row; the insertion point is clamped to the row list.
    pub fn insert_row(&mut self, at: usize) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, vec![String::new(); self.headers.len()]);
    }

    /// Delete rows by index. Splices in descending order so earlier removals
    /// don't shift later indices.
    pub fn delete_rows(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &idx in sorted.iter().rev() {
            if idx < self.rows.len() {
                self.rows.remove(idx);
            }
        }
    }

    /// Insert a column; existing column metadata at or right of `at` shifts.
    pub fn insert_column(&mut self, at: usize, name: &str) {
        let at = at.min(self.headers.len());
        self.headers.insert(at, name.to_string());
        for row in &mut self.rows {
            let pos = at.min(row.len());
            row.insert(pos, String::new());
        }
        self.columns_meta = self
            .columns_meta
            .iter()
            .map(|(&col, &meta)| (if col >= at { col + 1 } else { col }, meta))
            .collect();
    }

    /// Delete columns by index, dropping their metadata and shifting the rest.
    pub fn delete_columns(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &idx in sorted.iter().rev() {
            if idx >= self.headers.len() {
                continue;
            }
            self.headers.remove(idx);
            for row in &mut self.rows {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
            self.columns_meta = self
                .columns_meta
                .iter()
                .filter(|(&col, _)| col != idx)
                .map(|(&col, &meta)| (if col > idx { col - 1 } else { col }, meta))
                .collect();
        }
    }

    /// Move rows to `target`, an index into the pre-removal list. The moved
    /// block lands before the first staying row at or after `target`.
    pub fn move_rows(&mut self, indices: &[usize], target: usize) {
        if let Some(order) = move_order(self.rows.len(), indices, target) {
            self.rows = reorder(std::mem::take(&mut self.rows), &order);
        }
    }

    /// Move columns with the same partition semantics as `move_rows`.
    /// Headers, every row, and column metadata are remapped together.
    pub fn move_columns(&mut self, indices: &[usize], target: usize) {
        let Some(order) = move_order(self.headers.len(), indices, target) else {
            return;
        };
        self.headers = reorder(std::mem::take(&mut self.headers), &order);
        for row in &mut self.rows {
            // Short rows pad out so every row reorders by the same map.
            row.resize(order.len(), String::new());
            *row = reorder(std::mem::take(row), &order);
        }
        let mut remapped = FxHashMap::default();
        for (new_col, &old_col) in order.iter().enumerate() {
            if let Some(&meta) = self.columns_meta.get(&old_col) {
                remapped.insert(new_col, meta);
            }
        }
        self.columns_meta = remapped;
    }

    /// Paste a block of cells at (start_row, start_col), growing the table
    /// with empty rows and numbered columns where the block extends past its
    /// current bounds.
    pub fn paste_block(&mut self, start_row: usize, start_col: usize, block: &[Vec<String>]) {
        let needed_rows = start_row + block.len();
        let needed_cols = start_col
            + block
                .iter()
                .map(|row| row.len())
                .max()
                .unwrap_or(0);

        while self.rows.len() < needed_rows {
            self.rows.push(vec![String::new(); self.headers.len()]);
        }
        while self.headers.len() < needed_cols {
            let name = format!("Column {}", self.headers.len() + 1);
            self.headers.push(name);
        }
        for row in &mut self.rows {
            if row.len() < self.headers.len() {
                row.resize(self.headers.len(), String::new());
            }
        }

        for (dr, block_row) in block.iter().enumerate() {
            for (dc, value) in block_row.iter().enumerate() {
                self.update_cell(start_row + dr, start_col + dc, value);
            }
        }
    }

    /// Sort rows by a column, inferring its type: if every non-empty value
    /// parses as a number (thousands separators tolerated) the sort is
    /// numeric, otherwise case-insensitive text. Empty cells sort lowest.
    pub fn sort_rows(&mut self, col: usize, ascending: bool) {
        let numeric = self.rows.iter().any(|row| !cell_text(row, col).trim().is_empty())
            && self.rows.iter().all(|row| {
                let value = cell_text(row, col).trim();
                value.is_empty() || parse_number(value).is_some()
            });

        if numeric {
            self.rows.sort_by_key(|row| {
                let value = cell_text(row, col).trim();
                OrderedFloat(parse_number(value).unwrap_or(f64::NEG_INFINITY))
            });
        } else {
            self.rows
                .sort_by_key(|row| cell_text(row, col).to_lowercase());
        }
        if !ascending {
            self.rows.reverse();
        }
    }
}

fn cell_text(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn parse_number(value: &str) -> Option<f64> {
    value.replace(',', "").parse::<f64>().ok()
}

/// The old-index order after moving `indices` to `target`: staying items
/// keep their relative order, the moved block is inserted before the first
/// staying item at or after `target`. `None` when nothing valid moves.
fn move_order(len: usize, indices: &[usize], target: usize) -> Option<Vec<usize>> {
    let mut moving: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    moving.sort_unstable();
    moving.dedup();
    if moving.is_empty() {
        return None;
    }
    let moving_set: FxHashSet<usize> = moving.iter().copied().collect();

    let staying: Vec<usize> = (0..len).filter(|i| !moving_set.contains(i)).collect();
    let insert_at = (0..target.min(len))
        .filter(|i| !moving_set.contains(i))
        .count();

    let mut order = Vec::with_capacity(len);
    order.extend_from_slice(&staying[..insert_at]);
    order.extend_from_slice(&moving);
    order.extend_from_slice(&staying[insert_at..]);
    Some(order)
}

fn reorder<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .iter()
        .map(|&old| slots[old].take().expect("each index used once"))
        .collect()
}

/// Escape raw `|` characters for GFM table cells, leaving pipes inside
/// backtick spans and already-escaped pipes alone.
pub fn escape_pipes(value: &str) -> String {
    if !value.contains('|') {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len() + 4);
    let mut in_code = false;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => {
                in_code = !in_code;
                result.push(c);
            }
            '\\' => {
                result.push(c);
                if let Some(&next) = chars.peek() {
                    result.push(next);
                    chars.next();
                }
            }
            '|' if !in_code => {
                result.push('\\');
                result.push('|');
            }
            _ => result.push(c),
        }
    }

    result
}
