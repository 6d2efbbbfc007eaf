//! Event capture for assertions.

use crate::events::{EventKind, Handler, PaymentConfirmation, SheetEvent};
use crate::host::SheetHost;
use crate::PaymentSheet;
use std::cell::RefCell;
use std::rc::Rc;

/// Collects every event a sheet emits.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SheetEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to both events on `sheet`.
    pub fn attach<H: SheetHost>(&self, sheet: &mut PaymentSheet<H>) {
        let handler = self.handler();
        sheet.on(EventKind::PaymentConfirm, handler.clone());
        sheet.on(EventKind::PaymentClose, handler);
    }

    /// A handler that records into this log.
    pub fn handler(&self) -> Handler {
        let events = self.events.clone();
        Rc::new(move |event: &SheetEvent| events.borrow_mut().push(event.clone()))
    }

    pub fn events(&self) -> Vec<SheetEvent> {
        self.events.borrow().clone()
    }

    pub fn confirmations(&self) -> Vec<PaymentConfirmation> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SheetEvent::Confirm(c) => Some(c.clone()),
                SheetEvent::Close => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SheetEvent::Close))
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
