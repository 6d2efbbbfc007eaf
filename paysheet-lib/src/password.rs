//! Password pad state machine.
//!
//! A fixed-capacity digit buffer. Pressing the digit that fills it yields
//! [`PadInput::Complete`] with the entered password and leaves the buffer empty,
//! ready for the next entry.
//!
//! ```
//! use paysheet_lib::password::{PadInput, PasswordPad};
//!
//! let mut pad = PasswordPad::new(4);
//! for d in ['1', '2', '3'] {
//!     pad.press_digit(d);
//! }
//! assert_eq!(pad.press_digit('4'), PadInput::Complete("1234".to_string()));
//! assert!(pad.is_empty());
//! ```

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Result of feeding one key to the pad.
#[derive(Clone, PartialEq, Eq)]
pub enum PadInput {
    /// The key had no effect.
    Ignored,
    /// The buffer changed; `filled` digits are now entered.
    Updated { filled: usize },
    /// The buffer reached capacity. Carries the password; the pad is reset.
    Complete(String),
}

impl fmt::Debug for PadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignored => write!(f, "Ignored"),
            Self::Updated { filled } => write!(f, "Updated {{ filled: {filled} }}"),
            Self::Complete(p) => write!(f, "Complete(<{} digits>)", p.len()),
        }
    }
}

/// Digit buffer with auto-submit at capacity. Zeroized on clear and drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PasswordPad {
    #[zeroize(skip)]
    capacity: usize,
    buffer: String,
}

impl PasswordPad {
    /// Create a pad; `capacity` is clamped to `[4, 12]`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH),
            buffer: String::with_capacity(MAX_PASSWORD_LENGTH),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of digits entered so far.
    pub fn filled(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Change the capacity. Any partial entry is discarded.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH);
        self.clear();
    }

    /// Append a digit. Non-digits and presses at capacity are ignored.
    pub fn press_digit(&mut self, digit: char) -> PadInput {
        if !digit.is_ascii_digit() || self.buffer.len() >= self.capacity {
            return PadInput::Ignored;
        }
        self.buffer.push(digit);
        if self.buffer.len() == self.capacity {
            let password = self.buffer.clone();
            self.clear();
            PadInput::Complete(password)
        } else {
            PadInput::Updated {
                filled: self.buffer.len(),
            }
        }
    }

    /// Remove the last digit. Ignored when empty.
    pub fn press_delete(&mut self) -> PadInput {
        if self.buffer.pop().is_none() {
            return PadInput::Ignored;
        }
        PadInput::Updated {
            filled: self.buffer.len(),
        }
    }

    /// Discard the entry.
    pub fn clear(&mut self) {
        self.buffer.zeroize();
    }
}

impl fmt::Debug for PasswordPad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordPad")
            .field("capacity", &self.capacity)
            .field("filled", &self.buffer.len())
            .finish()
    }
}
