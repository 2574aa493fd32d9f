//! Event types for clipboard store change notifications.
//!
//! The shared clipboard store notifies each subscribed grid so its
//! copied-range indicator (the dashed border overlay) stays consistent when
//! another grid copies, or when a structural edit shifts or invalidates the
//! stored range. Also used by tests to verify notification ordering.

use marksheet_core::range::{Classification, RangeRect};

use crate::clipboard_store::GridOwner;

/// Events emitted by the clipboard store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardEvent {
    /// A new snapshot replaced whatever was stored before.
    SnapshotSet(SnapshotSetEvent),

    /// The snapshot was dropped (cut, explicit clear, or an overlapping
    /// structural edit). Carries the owner the snapshot belonged to.
    SnapshotCleared(SnapshotClearedEvent),

    /// A structural edit shifted the stored range without invalidating it.
    RangeShifted(RangeShiftedEvent),
}

/// Emitted when a copy stores a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSetEvent {
    pub owner: GridOwner,
    pub range: RangeRect,
    pub kind: Classification,
}

/// Emitted when the snapshot is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotClearedEvent {
    pub owner: GridOwner,
}

/// Emitted when an insert/delete before the stored range moved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShiftedEvent {
    pub owner: GridOwner,
    /// The range after shifting.
    pub range: RangeRect,
}

/// Callback type for receiving clipboard store events.
pub type ClipboardCallback = Box<dyn FnMut(&ClipboardEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<ClipboardEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: ClipboardEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ClipboardEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only SnapshotSet events.
    pub fn snapshots_set(&self) -> Vec<&SnapshotSetEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ClipboardEvent::SnapshotSet(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Filter to only SnapshotCleared events.
    pub fn snapshots_cleared(&self) -> Vec<&SnapshotClearedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ClipboardEvent::SnapshotCleared(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Filter to only RangeShifted events.
    pub fn ranges_shifted(&self) -> Vec<&RangeShiftedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ClipboardEvent::RangeShifted(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}
