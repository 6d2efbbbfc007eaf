//! Sheet notifications and their subscribers.
//!
//! Subscription is keyed by handler identity: registering the same
//! [`Handler`] twice for one event is the same as registering it once, and
//! [`EventBus::off`] removes it by the same identity.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Notification names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `payment-confirm`
    PaymentConfirm,
    /// `payment-close`
    PaymentClose,
}

impl EventKind {
    pub const PAYMENT_CONFIRM: &'static str = "payment-confirm";
    pub const PAYMENT_CLOSE: &'static str = "payment-close";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentConfirm => Self::PAYMENT_CONFIRM,
            Self::PaymentClose => Self::PAYMENT_CLOSE,
        }
    }
}

impl FromStr for EventKind {
    type Err = crate::PaysheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PAYMENT_CONFIRM => Ok(Self::PaymentConfirm),
            Self::PAYMENT_CLOSE => Ok(Self::PaymentClose),
            other => Err(crate::PaysheetError::invalid(
                "event",
                format!("unknown event name '{other}'"),
            )),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `payment-confirm`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// Identity of the selected method, `null` when nothing is selected.
    pub method: Value,
    /// The full selected record, `null` when nothing is selected.
    pub method_data: Value,
    /// Amount with exactly two decimals.
    pub amount: String,
    /// Present only when the password pad produced the confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A notification emitted by the sheet.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetEvent {
    Confirm(PaymentConfirmation),
    Close,
}

impl SheetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Confirm(_) => EventKind::PaymentConfirm,
            Self::Close => EventKind::PaymentClose,
        }
    }
}

/// A subscriber callback. Identity is the `Rc` allocation.
pub type Handler = Rc<dyn Fn(&SheetEvent)>;

fn same_handler(a: &Handler, b: &Handler) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Subscribers per event.
#[derive(Default)]
pub struct EventBus {
    confirm: Vec<Handler>,
    close: Vec<Handler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn handlers_mut(&mut self, kind: EventKind) -> &mut Vec<Handler> {
        match kind {
            EventKind::PaymentConfirm => &mut self.confirm,
            EventKind::PaymentClose => &mut self.close,
        }
    }

    fn handlers(&self, kind: EventKind) -> &[Handler] {
        match kind {
            EventKind::PaymentConfirm => &self.confirm,
            EventKind::PaymentClose => &self.close,
        }
    }

    /// Subscribe. Returns false if `handler` was already subscribed to `kind`.
    pub fn on(&mut self, kind: EventKind, handler: Handler) -> bool {
        let handlers = self.handlers_mut(kind);
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Unsubscribe. Returns false if `handler` was not subscribed to `kind`.
    pub fn off(&mut self, kind: EventKind, handler: &Handler) -> bool {
        let handlers = self.handlers_mut(kind);
        let before = handlers.len();
        handlers.retain(|h| !same_handler(h, handler));
        handlers.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers(kind).len()
    }

    /// Deliver `event` to its subscribers in subscription order.
    pub fn emit(&self, event: &SheetEvent) {
        for handler in self.handlers(event.kind()).to_vec() {
            handler(event);
        }
    }

    pub fn clear(&mut self) {
        self.confirm.clear();
        self.close.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("confirm", &self.confirm.len())
            .field("close", &self.close.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_names_round_trip() {
        assert_eq!("payment-confirm".parse::<EventKind>().unwrap(), EventKind::PaymentConfirm);
        assert_eq!(EventKind::PaymentClose.to_string(), "payment-close");
        assert!("payment-cancel".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_subscription_is_idempotent() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let handler: Handler = Rc::new(move |_| counter.set(counter.get() + 1));

        let mut bus = EventBus::new();
        assert!(bus.on(EventKind::PaymentClose, handler.clone()));
        assert!(!bus.on(EventKind::PaymentClose, handler.clone()));
        bus.emit(&SheetEvent::Close);
        assert_eq!(count.get(), 1);

        assert!(bus.off(EventKind::PaymentClose, &handler));
        assert!(!bus.off(EventKind::PaymentClose, &handler));
        bus.emit(&SheetEvent::Close);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_events_reach_only_their_subscribers() {
        let closes = Rc::new(Cell::new(0));
        let counter = closes.clone();
        let mut bus = EventBus::new();
        bus.on(
            EventKind::PaymentClose,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        bus.emit(&SheetEvent::Confirm(PaymentConfirmation {
            method: json!("card"),
            method_data: json!({ "value": "card" }),
            amount: "1.00".into(),
            password: None,
        }));
        assert_eq!(closes.get(), 0);
        assert_eq!(bus.listener_count(EventKind::PaymentConfirm), 0);
    }

    #[test]
    fn test_confirmation_payload_shape() {
        let without = PaymentConfirmation {
            method: json!(7),
            method_data: json!({ "id": 7 }),
            amount: "12.50".into(),
            password: None,
        };
        assert_eq!(
            serde_json::to_value(&without).unwrap(),
            json!({ "method": 7, "methodData": { "id": 7 }, "amount": "12.50" })
        );

        let with = PaymentConfirmation {
            password: Some("1234".into()),
            ..without
        };
        assert_eq!(serde_json::to_value(&with).unwrap()["password"], json!("1234"));
    }
}
