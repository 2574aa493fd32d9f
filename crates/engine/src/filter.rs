//! Row visibility for navigation.
//!
//! Filtering decides which data rows are visible; navigation consumes that
//! through the [`RowVisibility`] trait so the engine never owns filter
//! state. Key invariants:
//! - the visibility mask is indexed by data row
//! - rows outside the mask (the header pseudo-row, the ghost row) are
//!   always traversable
//! - lookups are O(1) after a recompute

use rustc_hash::{FxHashMap, FxHashSet};

/// Supplies the next visible row in a direction. `current` and the result
/// use `-1` for the header pseudo-row and `row_count` for the ghost row;
/// callers clamp the result to their own bounds.
pub trait RowVisibility {
    fn next_visible_row(&self, current: i64, delta: i64) -> i64;
}

/// No filtering: plain arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVisible;

impl RowVisibility for AllVisible {
    fn next_visible_row(&self, current: i64, delta: i64) -> i64 {
        current + delta
    }
}

/// Per-column allowed-value filters over a table's rows.
///
/// A row is visible iff, for every filtered column, its cell value is one of
/// that column's allowed values.
#[derive(Debug, Clone, Default)]
pub struct RowFilterView {
    filters: FxHashMap<usize, FxHashSet<String>>,
    /// Indexed by data row. Rebuilt by `recompute`.
    visible_mask: Vec<bool>,
}

impl RowFilterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `col` to the given values. Replaces any previous filter on
    /// that column; the mask is stale until `recompute`.
    pub fn set_filter(&mut self, col: usize, values: impl IntoIterator<Item = String>) {
        self.filters.insert(col, values.into_iter().collect());
    }

    pub fn clear_filter(&mut self, col: usize) {
        self.filters.remove(&col);
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
    }

    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Rebuild the visibility mask against the current rows.
    pub fn recompute(&mut self, rows: &[Vec<String>]) {
        self.visible_mask = rows
            .iter()
            .map(|row| {
                self.filters.iter().all(|(col, allowed)| {
                    let value = row.get(*col).map(String::as_str).unwrap_or("");
                    allowed.contains(value)
                })
            })
            .collect();
    }

    /// Check if a data row is visible. Rows beyond the mask (ghost) are.
    pub fn is_row_visible(&self, row: usize) -> bool {
        self.visible_mask.get(row).copied().unwrap_or(true)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_mask.iter().filter(|v| **v).count()
    }
}

impl RowVisibility for RowFilterView {
    fn next_visible_row(&self, current: i64, delta: i64) -> i64 {
        let step = delta.signum();
        if step == 0 {
            return current;
        }
        let mut row = current;
        for _ in 0..delta.abs() {
            let mut next = row + step;
            while next >= 0 && (next as usize) < self.visible_mask.len() && !self.visible_mask[next as usize]
            {
                next += step;
            }
            row = next;
        }
        row
    }
}
