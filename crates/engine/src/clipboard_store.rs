//! Shared copied-range store.
//!
//! At most one snapshot exists across all grid instances: copying in one grid
//! replaces (and thereby clears) another grid's indicator. The store is an
//! injected service, held by each grid controller as an
//! `Rc<RefCell<ClipboardStore>>`, so tests can instantiate isolated stores
//! instead of sharing a global.
//!
//! Structural edits in the owning table shift or invalidate the stored range.
//! The invariant the adjustment rules protect: the stored range must always
//! denote exactly the contiguous region the payload was copied from, or
//! nothing at all.

use log::debug;
use serde::{Deserialize, Serialize};

use marksheet_core::range::{Classification, RangeRect};

use crate::events::{
    ClipboardCallback, ClipboardEvent, RangeShiftedEvent, SnapshotClearedEvent, SnapshotSetEvent,
};

/// Identifies the (sheet, table) pair a snapshot was copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOwner {
    pub sheet: usize,
    pub table: usize,
}

/// The copied data plus the range it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardSnapshot {
    pub owner: GridOwner,
    pub range: RangeRect,
    pub payload: Vec<Vec<String>>,
    pub kind: Classification,
}

/// Outcome of adjusting one axis of the stored range for a structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisAdjust {
    Keep,
    Shift(i64),
    Invalidate,
}

/// Edit entirely before the span shifts it; any overlap invalidates; edit
/// entirely after leaves it alone. An insert exactly at `min` counts as
/// "before": it displaces the whole span without removing anything from it.
fn adjust_axis_insert(min: usize, max: usize, at: usize, count: usize) -> AxisAdjust {
    if at <= min {
        AxisAdjust::Shift(count as i64)
    } else if at <= max {
        AxisAdjust::Invalidate
    } else {
        AxisAdjust::Keep
    }
}

/// A delete must end strictly before `min` to shift; touching any index of
/// the span, including exactly `min`, invalidates.
fn adjust_axis_delete(min: usize, max: usize, at: usize, count: usize) -> AxisAdjust {
    if at + count <= min {
        AxisAdjust::Shift(-(count as i64))
    } else if at > max {
        AxisAdjust::Keep
    } else {
        AxisAdjust::Invalidate
    }
}

#[derive(Default)]
pub struct ClipboardStore {
    snapshot: Option<ClipboardSnapshot>,
    subscribers: Vec<ClipboardCallback>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&ClipboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Register a change listener. Subscribers hear about every set, clear,
    /// and shift, in the order they happened.
    pub fn subscribe(&mut self, callback: ClipboardCallback) {
        self.subscribers.push(callback);
    }

    fn notify(&mut self, event: ClipboardEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// True when the stored snapshot was produced by `owner`'s grid. Used to
    /// stop one grid from clearing another grid's indicator by accident.
    pub fn is_from_owner(&self, owner: GridOwner) -> bool {
        self.snapshot.as_ref().map_or(false, |s| s.owner == owner)
    }

    /// Replace the snapshot with a fresh copy.
    pub fn set_copied(
        &mut self,
        owner: GridOwner,
        payload: Vec<Vec<String>>,
        kind: Classification,
        range: RangeRect,
    ) {
        self.snapshot = Some(ClipboardSnapshot {
            owner,
            range,
            payload,
            kind,
        });
        self.notify(ClipboardEvent::SnapshotSet(SnapshotSetEvent {
            owner,
            range,
            kind,
        }));
    }

    /// Drop the snapshot unconditionally.
    pub fn clear(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.notify(ClipboardEvent::SnapshotCleared(SnapshotClearedEvent {
                owner: snapshot.owner,
            }));
        }
    }

    /// Drop the snapshot only if it belongs to `owner`.
    pub fn clear_if_owner(&mut self, owner: GridOwner) {
        if self.is_from_owner(owner) {
            self.clear();
        }
    }

    pub fn adjust_for_row_insert(&mut self, owner: GridOwner, at: usize, count: usize) {
        self.adjust(owner, |range| {
            adjust_axis_insert(range.min_row, range.max_row, at, count)
        }, Axis::Row);
    }

    pub fn adjust_for_row_delete(&mut self, owner: GridOwner, at: usize, count: usize) {
        self.adjust(owner, |range| {
            adjust_axis_delete(range.min_row, range.max_row, at, count)
        }, Axis::Row);
    }

    pub fn adjust_for_col_insert(&mut self, owner: GridOwner, at: usize, count: usize) {
        self.adjust(owner, |range| {
            adjust_axis_insert(range.min_col, range.max_col, at, count)
        }, Axis::Col);
    }

    pub fn adjust_for_col_delete(&mut self, owner: GridOwner, at: usize, count: usize) {
        self.adjust(owner, |range| {
            adjust_axis_delete(range.min_col, range.max_col, at, count)
        }, Axis::Col);
    }

    fn adjust(
        &mut self,
        owner: GridOwner,
        decide: impl Fn(&RangeRect) -> AxisAdjust,
        axis: Axis,
    ) {
        // Edits in another grid's table say nothing about this range.
        let Some(snapshot) = self.snapshot.as_mut() else {
            return;
        };
        if snapshot.owner != owner {
            return;
        }

        match decide(&snapshot.range) {
            AxisAdjust::Keep => {}
            AxisAdjust::Shift(delta) => {
                let apply = |v: usize| (v as i64 + delta).max(0) as usize;
                match axis {
                    Axis::Row => {
                        snapshot.range.min_row = apply(snapshot.range.min_row);
                        snapshot.range.max_row = apply(snapshot.range.max_row);
                    }
                    Axis::Col => {
                        snapshot.range.min_col = apply(snapshot.range.min_col);
                        snapshot.range.max_col = apply(snapshot.range.max_col);
                    }
                }
                let range = snapshot.range;
                self.notify(ClipboardEvent::RangeShifted(RangeShiftedEvent {
                    owner,
                    range,
                }));
            }
            AxisAdjust::Invalidate => {
                debug!("structural edit overlaps copied range; dropping snapshot");
                self.clear();
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OWNER: GridOwner = GridOwner { sheet: 0, table: 0 };
    const OTHER: GridOwner = GridOwner { sheet: 1, table: 0 };

    fn store_with_range(range: RangeRect) -> ClipboardStore {
        let mut store = ClipboardStore::new();
        store.set_copied(OWNER, vec![vec![String::new()]], Classification::Cell, range);
        store
    }

    #[test]
    fn test_copy_replaces_previous_snapshot() {
        let mut store = store_with_range(RangeRect::single(0, 0));
        store.set_copied(
            OTHER,
            vec![vec!["x".to_string()]],
            Classification::Rows,
            RangeRect::single(2, 0),
        );
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.owner, OTHER);
        assert_eq!(snapshot.kind, Classification::Rows);
    }

    #[test]
    fn test_clear_if_owner_respects_ownership() {
        let mut store = store_with_range(RangeRect::single(0, 0));
        store.clear_if_owner(OTHER);
        assert!(store.snapshot().is_some());
        store.clear_if_owner(OWNER);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_row_insert_before_shifts_down() {
        let mut store = store_with_range(RangeRect::new(2, 0, 3, 1));
        store.adjust_for_row_insert(OWNER, 1, 2);
        let range = store.snapshot().unwrap().range;
        assert_eq!(range, RangeRect::new(4, 0, 5, 1));
    }

    #[test]
    fn test_row_insert_at_top_edge_shifts_not_invalidates() {
        let mut store = store_with_range(RangeRect::new(2, 0, 3, 1));
        store.adjust_for_row_insert(OWNER, 2, 1);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(3, 0, 4, 1));
    }

    #[test]
    fn test_row_insert_inside_invalidates() {
        let mut store = store_with_range(RangeRect::new(2, 0, 4, 1));
        store.adjust_for_row_insert(OWNER, 3, 1);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_row_insert_after_keeps() {
        let mut store = store_with_range(RangeRect::new(2, 0, 3, 1));
        store.adjust_for_row_insert(OWNER, 4, 5);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(2, 0, 3, 1));
    }

    #[test]
    fn test_row_delete_before_shifts_up() {
        let mut store = store_with_range(RangeRect::new(4, 0, 5, 1));
        store.adjust_for_row_delete(OWNER, 1, 2);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(2, 0, 3, 1));
    }

    #[test]
    fn test_row_delete_touching_min_edge_invalidates() {
        let mut store = store_with_range(RangeRect::new(4, 0, 5, 1));
        // Delete [3, 4]: removes the top copied row.
        store.adjust_for_row_delete(OWNER, 3, 2);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_row_delete_after_keeps() {
        let mut store = store_with_range(RangeRect::new(1, 0, 2, 1));
        store.adjust_for_row_delete(OWNER, 3, 2);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(1, 0, 2, 1));
    }

    #[test]
    fn test_col_insert_at_left_edge_shifts_right() {
        // Copied column 0; inserting a column at 0 shifts the indicator to 1.
        let mut store = ClipboardStore::new();
        store.set_copied(
            OWNER,
            vec![vec!["a".to_string()]],
            Classification::Columns,
            RangeRect::new(0, 0, 2, 0),
        );
        store.adjust_for_col_insert(OWNER, 0, 1);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(0, 1, 2, 1));
    }

    #[test]
    fn test_col_delete_overlap_invalidates() {
        let mut store = store_with_range(RangeRect::new(0, 1, 2, 2));
        store.adjust_for_col_delete(OWNER, 2, 1);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_adjust_ignores_edits_from_other_grids() {
        let mut store = store_with_range(RangeRect::new(2, 0, 3, 1));
        store.adjust_for_row_insert(OTHER, 0, 4);
        assert_eq!(store.snapshot().unwrap().range, RangeRect::new(2, 0, 3, 1));
    }

    #[test]
    fn test_notifications_fire_in_order() {
        use crate::events::EventCollector;
        use std::cell::RefCell;
        use std::rc::Rc;

        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = events.clone();

        let mut store = ClipboardStore::new();
        store.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        store.set_copied(
            OWNER,
            vec![vec!["a".to_string()]],
            Classification::Cell,
            RangeRect::new(1, 0, 1, 0),
        );
        store.adjust_for_row_insert(OWNER, 0, 1);
        store.adjust_for_row_insert(OWNER, 2, 1);

        let events = events.borrow();
        assert_eq!(events.snapshots_set().len(), 1);
        assert_eq!(events.ranges_shifted().len(), 1);
        assert_eq!(events.ranges_shifted()[0].range, RangeRect::new(2, 0, 2, 0));
        assert_eq!(events.snapshots_cleared().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_row_insert_shift_law(
            min in 0usize..20,
            span in 0usize..5,
            at in 0usize..30,
            count in 1usize..4,
        ) {
            let max = min + span;
            let mut store = store_with_range(RangeRect::new(min, 0, max, 2));
            store.adjust_for_row_insert(OWNER, at, count);

            if at <= min {
                let range = store.snapshot().unwrap().range;
                prop_assert_eq!(range.min_row, min + count);
                prop_assert_eq!(range.max_row, max + count);
                // Columns untouched.
                prop_assert_eq!(range.min_col, 0);
                prop_assert_eq!(range.max_col, 2);
            } else if at <= max {
                prop_assert!(store.snapshot().is_none());
            } else {
                prop_assert_eq!(store.snapshot().unwrap().range, RangeRect::new(min, 0, max, 2));
            }
        }

        #[test]
        fn prop_row_delete_shift_law(
            min in 0usize..20,
            span in 0usize..5,
            at in 0usize..30,
            count in 1usize..4,
        ) {
            let max = min + span;
            let mut store = store_with_range(RangeRect::new(min, 0, max, 2));
            store.adjust_for_row_delete(OWNER, at, count);

            if at + count <= min {
                let range = store.snapshot().unwrap().range;
                prop_assert_eq!(range.min_row, min - count);
                prop_assert_eq!(range.max_row, max - count);
            } else if at > max {
                prop_assert_eq!(store.snapshot().unwrap().range, RangeRect::new(min, 0, max, 2));
            } else {
                prop_assert!(store.snapshot().is_none());
            }
        }
    }
}
