//! Pin command - type a key sequence on the password pad

use anyhow::Result;
use paysheet_lib::events::SheetEvent;
use paysheet_lib::password::PadInput;

use super::SheetOptions;
use crate::ui;

/// Key that stands for the pad's delete button.
pub const DELETE_KEY: char = '<';

/// What a typed key sequence produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PinReport {
    /// Digits entered when typing stopped.
    pub filled: usize,
    pub still_open: bool,
    pub events: Vec<SheetEvent>,
    /// Keys that had no effect.
    pub ignored: usize,
}

/// Open a password-mode sheet at `amount` and press `keys` in order.
///
/// Digits go to the pad and [`DELETE_KEY`] deletes; anything else is pressed
/// as-is and ignored by the pad. Typing stops once the sheet closes.
pub fn enter_keys(options: &SheetOptions, amount: f64, keys: &str) -> Result<PinReport> {
    let mut sheet = options.build_sheet()?;
    sheet.set_enable_password(true);
    let captured = super::capture_events(&mut sheet);
    sheet.open(Some(amount));

    let mut ignored = 0;
    for key in keys.chars() {
        if !sheet.is_open() {
            break;
        }
        let input = if key == DELETE_KEY {
            sheet.press_delete()
        } else {
            sheet.press_digit(key)
        };
        if input == PadInput::Ignored {
            ignored += 1;
        }
    }

    let events = captured.borrow().clone();
    Ok(PinReport {
        filled: sheet.password_filled(),
        still_open: sheet.is_open(),
        events,
        ignored,
    })
}

pub fn run(options: &SheetOptions, amount: f64, keys: &str) -> Result<()> {
    let report = enter_keys(options, amount, keys)?;

    ui::header("Password Pad");
    ui::key_value("Keys", &keys.chars().count().to_string());
    if report.ignored > 0 {
        ui::warning(&format!("{} key(s) ignored", report.ignored));
    }
    if report.still_open {
        ui::info(&format!("{} digit(s) entered, sheet still open", report.filled));
    }
    super::print_events(&report.events);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_digits() -> SheetOptions {
        SheetOptions {
            password_length: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_entry_confirms_once() {
        let report = enter_keys(&four_digits(), 12.5, "1234").unwrap();
        assert!(!report.still_open);
        match &report.events[..] {
            [SheetEvent::Confirm(c), SheetEvent::Close] => {
                assert_eq!(c.password.as_deref(), Some("1234"));
                assert_eq!(c.amount, "12.50");
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_delete_and_junk_keys() {
        let report = enter_keys(&four_digits(), 1.0, "<1x2<").unwrap();
        assert!(report.still_open);
        assert_eq!(report.filled, 1);
        assert_eq!(report.ignored, 2);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_keys_after_completion_are_dropped() {
        let report = enter_keys(&four_digits(), 1.0, "123456").unwrap();
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.ignored, 0);
    }
}
