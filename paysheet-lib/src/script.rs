//! Scripted contact replays.
//!
//! A [`GestureScript`] is a press followed by move samples, parsed from a
//! compact text form: an optional origin, `@`, then `time:y` pairs separated by
//! commas. The first pair is the press; release follows the last.
//!
//! ```
//! use paysheet_lib::gesture::DragOrigin;
//! use paysheet_lib::script::GestureScript;
//!
//! let script: GestureScript = "handle@0:0,22:20".parse().unwrap();
//! assert_eq!(script.origin, DragOrigin::Handle);
//! assert_eq!(script.samples.len(), 2);
//! ```

use crate::gesture::{DismissDecision, DragOrigin};
use crate::host::SheetHost;
use crate::{PaymentSheet, PaysheetError};
use std::str::FromStr;

/// One pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Milliseconds.
    pub time: f64,
    /// Pixels, growing downward.
    pub y: f64,
}

/// A press-move-release sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureScript {
    pub origin: DragOrigin,
    /// Press first, then moves. Never empty.
    pub samples: Vec<Sample>,
}

/// What happened when a script was replayed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Replay {
    /// Whether the press was captured as a drag.
    pub captured: bool,
    /// The release decision, if a drag was active.
    pub decision: Option<DismissDecision>,
}

impl GestureScript {
    pub fn new(origin: DragOrigin, samples: Vec<Sample>) -> Result<Self, PaysheetError> {
        if samples.is_empty() {
            return Err(PaysheetError::invalid("samples", "at least the press sample is required"));
        }
        Ok(Self { origin, samples })
    }

    /// A straight drag from `from` to `to` over `duration` ms in `steps` moves.
    pub fn linear(origin: DragOrigin, from: f64, to: f64, duration: f64, steps: usize) -> Self {
        let steps = steps.max(1);
        let samples = (0..=steps)
            .map(|i| {
                let f = i as f64 / steps as f64;
                Sample {
                    time: duration * f,
                    y: from + (to - from) * f,
                }
            })
            .collect();
        Self { origin, samples }
    }

    /// Drive `sheet` through the press, moves and release.
    pub fn replay<H: SheetHost>(&self, sheet: &mut PaymentSheet<H>) -> Replay {
        self.replay_with(sheet, |_| {})
    }

    /// Like [`replay`](Self::replay), calling `on_move` after every move the
    /// sheet consumed as part of a drag.
    pub fn replay_with<H, F>(&self, sheet: &mut PaymentSheet<H>, mut on_move: F) -> Replay
    where
        H: SheetHost,
        F: FnMut(&PaymentSheet<H>),
    {
        let (press, moves) = match self.samples.split_first() {
            Some(split) => split,
            None => {
                return Replay {
                    captured: false,
                    decision: None,
                }
            }
        };
        let captured = sheet.pointer_down(self.origin, press.y, press.time);
        for sample in moves {
            if sheet.pointer_move(sample.y, sample.time) {
                on_move(sheet);
            }
        }
        Replay {
            captured,
            decision: sheet.pointer_up(),
        }
    }
}

impl FromStr for DragOrigin {
    type Err = PaysheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "handle" => Ok(Self::Handle),
            "header" => Ok(Self::Header),
            "surface" | "sheet" => Ok(Self::Surface),
            "content" | "list" => Ok(Self::Content),
            "actions" | "buttons" => Ok(Self::Actions),
            "keypad" => Ok(Self::Keypad),
            "close" | "close-button" => Ok(Self::CloseButton),
            other => Err(PaysheetError::invalid(
                "origin",
                format!("unknown drag origin '{other}'"),
            )),
        }
    }
}

impl FromStr for GestureScript {
    type Err = PaysheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, pairs) = match s.split_once('@') {
            Some((origin, pairs)) => (origin.parse()?, pairs),
            None => (DragOrigin::Handle, s),
        };
        let samples = pairs
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(parse_sample)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(origin, samples)
    }
}

fn parse_sample(pair: &str) -> Result<Sample, PaysheetError> {
    let (time, y) = pair
        .split_once(':')
        .ok_or_else(|| PaysheetError::invalid("samples", format!("expected time:y, got '{pair}'")))?;
    let number = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| PaysheetError::invalid("samples", format!("not a number: '{v}'")))
    };
    Ok(Sample {
        time: number(time)?,
        y: number(y)?,
    })
}
