//! Checkout command - walk through the sheet interactively

use anyhow::Result;
use paysheet_lib::events::SheetEvent;
use paysheet_lib::PaymentSheet;

use super::SheetOptions;
use crate::terminal::TerminalHost;
use crate::ui;

/// How the user left the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
    /// Digits typed on the password pad.
    Password(String),
}

/// Apply a method choice and a decision to an open sheet.
pub fn complete(sheet: &mut PaymentSheet<TerminalHost>, method: usize, decision: &Decision) {
    sheet.select_method(method);
    match decision {
        Decision::Confirm => sheet.confirm(),
        Decision::Cancel => sheet.cancel(),
        Decision::Password(digits) => {
            for digit in digits.chars() {
                if !sheet.is_open() {
                    break;
                }
                sheet.press_digit(digit);
            }
        }
    }
}

/// Non-interactive checkout: open at `amount`, pick `method`, decide.
pub fn scripted(
    options: &SheetOptions,
    amount: f64,
    method: usize,
    decision: &Decision,
) -> Result<Vec<SheetEvent>> {
    let mut sheet = options.build_sheet()?;
    let captured = super::capture_events(&mut sheet);
    sheet.open(Some(amount));
    complete(&mut sheet, method, decision);
    let events = captured.borrow().clone();
    Ok(events)
}

pub fn run(options: &SheetOptions, amount: f64, verbose: bool) -> Result<()> {
    let mut sheet = options.build_sheet()?;
    sheet.host_mut().set_echo(verbose);
    let captured = super::capture_events(&mut sheet);
    sheet.open(Some(amount));

    ui::clear();
    println!("{}", sheet.host().render());

    let labels: Vec<String> = sheet
        .registry()
        .displays()
        .into_iter()
        .map(|m| format!("{} {}", m.icon, m.title))
        .collect();
    let method = ui::select("Payment method", &labels, sheet.registry().selected_index().unwrap_or(0))?;
    sheet.select_method(method);

    let decision = if sheet.config().enable_password {
        let length = sheet.config().password_length;
        let digits = ui::password(&format!("Password ({} digits, empty to cancel)", length))?;
        if digits.is_empty() {
            Decision::Cancel
        } else {
            Decision::Password(digits)
        }
    } else if ui::confirm(&format!("Pay ¥{}?", sheet.formatted_amount()), true)? {
        Decision::Confirm
    } else {
        Decision::Cancel
    };

    complete(&mut sheet, method, &decision);
    if sheet.is_open() {
        ui::warning(&format!(
            "Only {} of {} digits entered",
            sheet.password_filled(),
            sheet.config().password_length
        ));
        sheet.cancel();
    }

    println!();
    let events = captured.borrow().clone();
    super::print_events(&events);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirm_reports_chosen_method() {
        let events = scripted(&SheetOptions::default(), 30.0, 2, &Decision::Confirm).unwrap();
        match &events[..] {
            [SheetEvent::Confirm(c), SheetEvent::Close] => {
                assert_eq!(c.method, json!("card"));
                assert_eq!(c.amount, "30.00");
                assert!(c.password.is_none());
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_cancel_only_closes() {
        let events = scripted(&SheetOptions::default(), 30.0, 0, &Decision::Cancel).unwrap();
        assert_eq!(events, vec![SheetEvent::Close]);
    }

    #[test]
    fn test_confirm_button_ignored_in_password_mode() {
        let options = SheetOptions {
            enable_password: true,
            ..Default::default()
        };
        let events = scripted(&options, 30.0, 0, &Decision::Confirm).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_short_password_leaves_sheet_open() {
        let options = SheetOptions {
            enable_password: true,
            password_length: Some(6),
            ..Default::default()
        };
        let events = scripted(&options, 30.0, 0, &Decision::Password("123".into())).unwrap();
        assert!(events.is_empty());
    }
}
