//! Paysheet library.
//!
//! A headless, embeddable bottom sheet for confirming a payment: an amount, a
//! list of selectable payment methods, and either confirm/cancel actions or an
//! inline numeric password pad. The sheet can be dismissed by dragging it down.
//!
//! All state and every decision live in [`PaymentSheet`]; rendering surfaces
//! plug in through the [`SheetHost`] trait.
//!
//! # Example
//!
//! ```
//! use paysheet_lib::events::{EventKind, SheetEvent};
//! use paysheet_lib::gesture::DragOrigin;
//! use paysheet_lib::test_utils::RecordingHost;
//! use paysheet_lib::PaymentSheet;
//! use std::rc::Rc;
//!
//! let mut sheet = PaymentSheet::new(RecordingHost::new(400.0));
//! sheet.on(
//!     EventKind::PaymentClose,
//!     Rc::new(|event: &SheetEvent| println!("{}", event.kind())),
//! );
//!
//! sheet.open(Some(25.0));
//! sheet.pointer_down(DragOrigin::Handle, 0.0, 0.0);
//! sheet.pointer_move(150.0, 400.0);
//! sheet.pointer_up();
//! assert!(!sheet.is_open());
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod gesture;
pub mod host;
pub mod methods;
pub mod password;
pub mod script;
mod sheet;

/// Recording host and event capture for tests and examples.
pub mod test_utils;

pub use config::{ConfigPatch, SheetConfig};
pub use errors::{PaysheetError, PaysheetErrorCode};
pub use events::{EventKind, Handler, PaymentConfirmation, SheetEvent};
pub use host::SheetHost;
pub use methods::{FieldMapping, MethodDisplay, PaymentMethod};
pub use sheet::{format_amount, PaymentSheet};

/// Common result alias for Paysheet operations.
pub type Result<T> = std::result::Result<T, PaysheetError>;
