//! Drag command - replay a scripted gesture against an open sheet

use anyhow::Result;
use paysheet_lib::events::SheetEvent;
use paysheet_lib::gesture::DragOutcome;
use paysheet_lib::script::{GestureScript, Replay};

use super::SheetOptions;
use crate::ui;

/// Result of one simulated gesture.
#[derive(Debug, Clone)]
pub struct DragReport {
    pub replay: Replay,
    /// Whether the sheet was still open after release.
    pub still_open: bool,
    pub events: Vec<SheetEvent>,
    /// Last frame drawn before release, as text.
    pub last_frame: Option<String>,
}

/// Parse a gesture script such as `handle@0:0,40:80,80:160`.
pub fn parse_script(text: &str) -> Result<GestureScript> {
    Ok(text.parse::<GestureScript>()?)
}

/// Open a sheet built from `options`, replay `script` and report the outcome.
pub fn simulate(options: &SheetOptions, script: &GestureScript) -> Result<DragReport> {
    let mut sheet = options.build_sheet()?;
    let captured = super::capture_events(&mut sheet);
    sheet.open(None);

    let mut last_frame = None;
    let replay = script.replay_with(&mut sheet, |sheet| {
        last_frame = Some(sheet.host().render());
    });

    let events = captured.borrow().clone();
    Ok(DragReport {
        replay,
        still_open: sheet.is_open(),
        events,
        last_frame,
    })
}

pub fn run(options: &SheetOptions, script: &str, show_frames: bool) -> Result<()> {
    let script = parse_script(script)?;
    tracing::debug!(origin = ?script.origin, samples = script.samples.len(), "replaying gesture");
    let report = simulate(options, &script)?;

    ui::header("Gesture Replay");
    ui::key_value("Origin", &format!("{:?}", script.origin));
    ui::key_value("Samples", &script.samples.len().to_string());

    if !report.replay.captured {
        ui::warning("Press was not captured as a drag; the sheet did not move");
        return Ok(());
    }

    if show_frames {
        if let Some(frame) = &report.last_frame {
            println!("{}", frame);
        }
    }

    if let Some(decision) = report.replay.decision {
        ui::key_value("Travel", &format!("{:.1}px", decision.delta));
        ui::key_value("Threshold", &format!("{:.1}px", decision.threshold));
        ui::key_value("Velocity", &format!("{:.3}px/ms", decision.velocity));
        ui::key_value("Final direction", &format!("{:.3}px/ms", decision.final_direction));
        ui::separator();
        match decision.outcome {
            DragOutcome::Dismiss => ui::success("Sheet dismissed"),
            DragOutcome::SnapBack => ui::info("Sheet snapped back"),
        }
    }
    super::print_events(&report.events);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_drag_past_threshold_dismisses() {
        let script = parse_script("handle@0:0,100:80,200:130").unwrap();
        let report = simulate(&SheetOptions::default(), &script).unwrap();
        assert!(report.replay.captured);
        assert_eq!(report.replay.decision.unwrap().outcome, DragOutcome::Dismiss);
        assert!(!report.still_open);
        assert_eq!(report.events, vec![SheetEvent::Close]);
        assert!(report.last_frame.unwrap().contains("dragged 130px"));
    }

    #[test]
    fn test_content_press_is_not_captured() {
        let script = parse_script("content@0:0,10:300").unwrap();
        let report = simulate(&SheetOptions::default(), &script).unwrap();
        assert!(!report.replay.captured);
        assert!(report.replay.decision.is_none());
        assert!(report.still_open);
        assert!(report.last_frame.is_none());
    }

    #[test]
    fn test_no_swipe_flag_disables_drag() {
        let options = SheetOptions {
            no_swipe: true,
            ..Default::default()
        };
        let script = parse_script("handle@0:0,50:300").unwrap();
        let report = simulate(&options, &script).unwrap();
        assert!(!report.replay.captured);
        assert!(report.still_open);
    }
}
