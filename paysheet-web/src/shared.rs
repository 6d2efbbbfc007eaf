//! Page-wide shared sheet.
//!
//! A compatibility shim for pages that want one sheet without holding on to
//! a handle. Everything it offers is also available through an explicit
//! [`PaymentSheetWidget`].

use crate::utils;
use crate::widget::PaymentSheetWidget;
use paysheet_lib::{ConfigPatch, PaysheetError};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static SHARED: RefCell<Option<PaymentSheetWidget>> = const { RefCell::new(None) };
}

/// The page's shared sheet, created in `document.body` on first use.
///
/// Fails while the document has no body; call again once it is ready.
#[wasm_bindgen(js_name = sharedPaymentSheet)]
pub fn shared_payment_sheet() -> Result<PaymentSheetWidget, JsValue> {
    if let Some(existing) = SHARED.with(|shared| shared.borrow().clone()) {
        if existing.is_mounted() {
            return Ok(existing);
        }
    }

    let document = utils::document()?;
    let body = document.body().ok_or_else(|| {
        utils::to_js_error(PaysheetError::HostUnavailable(
            "document.body is not available yet".into(),
        ))
    })?;
    let widget = PaymentSheetWidget::mount(&document, &body, &ConfigPatch::default())?;
    SHARED.with(|shared| *shared.borrow_mut() = Some(widget.clone()));
    Ok(widget)
}

/// Destroy and forget the shared sheet, if one exists.
#[wasm_bindgen(js_name = releaseSharedPaymentSheet)]
pub fn release_shared_payment_sheet() {
    if let Some(widget) = SHARED.with(|shared| shared.borrow_mut().take()) {
        widget.destroy();
    }
}
