//! Test harness for grid scenarios with event tracking.
//!
//! Wires one or more controllers to a shared clipboard store and an event
//! collector, so tests can drive multi-grid flows without a host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clipboard_store::{ClipboardStore, GridOwner};
use crate::controller::GridController;
use crate::events::EventCollector;
use crate::settings::EngineSettings;
use crate::table::Table;

pub struct GridHarness {
    pub store: Rc<RefCell<ClipboardStore>>,
    pub events: Rc<RefCell<EventCollector>>,
}

impl GridHarness {
    pub fn new() -> Self {
        let store = Rc::new(RefCell::new(ClipboardStore::new()));
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = events.clone();
        store
            .borrow_mut()
            .subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));
        Self { store, events }
    }

    /// A controller over a 2x2 table with headers H1/H2, sharing this
    /// harness's store.
    pub fn grid_2x2(&self, sheet: usize, table_idx: usize) -> GridController {
        let table = Table::from_rows(
            "T1",
            vec!["H1".to_string(), "H2".to_string()],
            vec![
                vec!["A1".to_string(), "B1".to_string()],
                vec!["A2".to_string(), "B2".to_string()],
            ],
        );
        GridController::new(
            GridOwner {
                sheet,
                table: table_idx,
            },
            table,
            self.store.clone(),
            EngineSettings::default(),
        )
    }
}
