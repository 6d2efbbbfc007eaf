//! Drag-to-dismiss behaviour through the full sheet.

use paysheet_lib::gesture::{DragOrigin, DragOutcome, GestureState};
use paysheet_lib::script::{GestureScript, Sample};
use paysheet_lib::test_utils::{EventLog, HostCall, RecordingHost};
use paysheet_lib::{ConfigPatch, PaymentSheet};

fn open_sheet(height: f64) -> (PaymentSheet<RecordingHost>, EventLog) {
    let mut sheet = PaymentSheet::new(RecordingHost::new(height));
    let log = EventLog::new();
    log.attach(&mut sheet);
    sheet.open(Some(5.0));
    sheet.host_mut().take_calls();
    (sheet, log)
}

fn script(origin: DragOrigin, samples: &[(f64, f64)]) -> GestureScript {
    GestureScript::new(
        origin,
        samples
            .iter()
            .map(|&(time, y)| Sample { time, y })
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_slow_drag_past_effective_threshold_closes() {
    let (mut sheet, log) = open_sheet(400.0);
    let replay = GestureScript::linear(DragOrigin::Handle, 0.0, 130.0, 1300.0, 10).replay(&mut sheet);

    let decision = replay.decision.unwrap();
    assert_eq!(decision.threshold, 120.0);
    assert!(decision.velocity < 0.5);
    assert_eq!(decision.outcome, DragOutcome::Dismiss);
    assert!(!sheet.is_open());
    assert_eq!(log.close_count(), 1);
}

#[test]
fn test_slow_drag_short_of_threshold_snaps_back() {
    let (mut sheet, log) = open_sheet(400.0);
    let replay = GestureScript::linear(DragOrigin::Handle, 0.0, 110.0, 1100.0, 10).replay(&mut sheet);

    assert_eq!(replay.decision.unwrap().outcome, DragOutcome::SnapBack);
    assert!(sheet.is_open());
    assert_eq!(log.close_count(), 0);
    assert!(sheet.host().drag_frame().is_none());
    assert!(sheet.host().transitions_enabled());
    assert_eq!(sheet.gesture_state(), GestureState::Idle);
}

#[test]
fn test_absolute_threshold_wins_on_short_panels() {
    let (mut sheet, _) = open_sheet(200.0);
    let replay = GestureScript::linear(DragOrigin::Header, 0.0, 90.0, 900.0, 9).replay(&mut sheet);
    let decision = replay.decision.unwrap();
    assert_eq!(decision.threshold, 100.0);
    assert_eq!(decision.outcome, DragOutcome::SnapBack);
}

#[test]
fn test_quick_downward_flick_closes() {
    let (mut sheet, _) = open_sheet(400.0);
    let replay = script(DragOrigin::Handle, &[(0.0, 0.0), (22.0, 20.0)]).replay(&mut sheet);
    let decision = replay.decision.unwrap();
    assert!(decision.velocity > 0.9);
    assert_eq!(decision.outcome, DragOutcome::Dismiss);
    assert!(!sheet.is_open());
}

#[test]
fn test_flick_reversed_at_release_stays_open() {
    let (mut sheet, _) = open_sheet(400.0);
    let replay = script(
        DragOrigin::Handle,
        &[(0.0, 0.0), (22.0, 25.0), (27.0, 20.0)],
    )
    .replay(&mut sheet);
    let decision = replay.decision.unwrap();
    assert!(decision.velocity > 0.5);
    assert_eq!(decision.outcome, DragOutcome::SnapBack);
    assert!(sheet.is_open());
}

#[test]
fn test_drag_above_rest_never_lifts_the_sheet() {
    let (mut sheet, _) = open_sheet(400.0);
    assert!(sheet.pointer_down(DragOrigin::Handle, 200.0, 0.0));
    sheet.pointer_move(150.0, 5.0);
    let frame = sheet.host().drag_frame().unwrap();
    assert_eq!(frame.offset, 0.0);
    assert_eq!(frame.backdrop_opacity, 1.0);
    assert_eq!(sheet.pointer_up().unwrap().outcome, DragOutcome::SnapBack);
}

#[test]
fn test_live_frame_tracks_pointer() {
    let (mut sheet, _) = open_sheet(400.0);
    sheet.pointer_down(DragOrigin::Surface, 10.0, 0.0);
    assert!(!sheet.host().transitions_enabled());
    sheet.pointer_move(110.0, 500.0);
    let frame = sheet.host().drag_frame().unwrap();
    assert_eq!(frame.offset, 100.0);
    assert_eq!(frame.backdrop_opacity, 0.75);
}

#[test]
fn test_press_in_content_is_not_captured() {
    let (mut sheet, log) = open_sheet(400.0);
    for origin in [
        DragOrigin::Content,
        DragOrigin::Actions,
        DragOrigin::Keypad,
        DragOrigin::CloseButton,
    ] {
        let replay = GestureScript::linear(origin, 0.0, 300.0, 100.0, 5).replay(&mut sheet);
        assert!(!replay.captured);
        assert!(replay.decision.is_none());
        assert_eq!(sheet.gesture_state(), GestureState::Idle);
    }
    assert!(sheet.is_open());
    assert_eq!(log.close_count(), 0);
    assert!(!sheet
        .host()
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::ApplyDragFrame(_))));
}

#[test]
fn test_swipe_disabled_ignores_drags() {
    let (mut sheet, _) = open_sheet(400.0);
    sheet.set_allow_swipe_to_close(false);
    let replay = GestureScript::linear(DragOrigin::Handle, 0.0, 300.0, 100.0, 5).replay(&mut sheet);
    assert!(!replay.captured);
    assert!(sheet.is_open());
}

#[test]
fn test_custom_thresholds_apply() {
    let (mut sheet, _) = open_sheet(400.0);
    sheet.set_config(
        &ConfigPatch::new()
            .with_close_threshold(40.0)
            .with_close_threshold_percent(0.0)
            .with_velocity_threshold(10.0),
    );
    let replay = GestureScript::linear(DragOrigin::Handle, 0.0, 50.0, 100.0, 5).replay(&mut sheet);
    let decision = replay.decision.unwrap();
    assert_eq!(decision.threshold, 40.0);
    assert_eq!(decision.outcome, DragOutcome::Dismiss);
}

#[test]
fn test_cancel_resolves_like_release() {
    let (mut sheet, _) = open_sheet(400.0);
    sheet.pointer_down(DragOrigin::Handle, 0.0, 0.0);
    sheet.pointer_move(200.0, 2000.0);
    let decision = sheet.pointer_cancel().unwrap();
    assert_eq!(decision.outcome, DragOutcome::Dismiss);
    assert!(!sheet.is_open());
}

#[test]
fn test_second_press_during_drag_is_ignored() {
    let (mut sheet, _) = open_sheet(400.0);
    assert!(sheet.pointer_down(DragOrigin::Handle, 0.0, 0.0));
    assert!(!sheet.pointer_down(DragOrigin::Header, 300.0, 10.0));
    sheet.pointer_move(50.0, 1000.0);
    assert_eq!(sheet.pointer_up().unwrap().delta, 50.0);
}
