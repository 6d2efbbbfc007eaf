//! Property-based tests for paysheet-demo-cli
//!
//! Uses proptest to verify script parsing and simulated gestures for arbitrary inputs

use paysheet_demo_cli::commands::{drag, pin, SheetOptions};
use paysheet_lib::gesture::DragOutcome;
use proptest::prelude::*;

proptest! {
    /// Well-formed scripts parse with every sample kept in order
    #[test]
    fn test_script_round_trips_samples(
        samples in prop::collection::vec((0u32..100_000, -2000i32..2000), 1..30)
    ) {
        let body: Vec<String> = samples.iter().map(|(t, y)| format!("{}:{}", t, y)).collect();
        let script = drag::parse_script(&format!("handle@{}", body.join(","))).unwrap();
        prop_assert_eq!(script.samples.len(), samples.len());
        for (sample, (t, y)) in script.samples.iter().zip(&samples) {
            prop_assert_eq!(sample.time, *t as f64);
            prop_assert_eq!(sample.y, *y as f64);
        }
    }

    /// Garbage in a sample is rejected rather than skipped
    #[test]
    fn test_non_numeric_samples_fail(junk in "[a-z]{1,6}") {
        let bad_time = format!("handle@0:0,{}:10", junk);
        let bad_y = format!("handle@0:0,10:{}", junk);
        prop_assert!(drag::parse_script(&bad_time).is_err(), "accepted {}", bad_time);
        prop_assert!(drag::parse_script(&bad_y).is_err(), "accepted {}", bad_y);
    }

    /// A slow drag dismisses exactly when it travels past the effective distance
    #[test]
    fn test_slow_drag_follows_distance(travel in 0.0f64..400.0, threshold in 0.0f64..300.0) {
        prop_assume!((travel - threshold.max(120.0)).abs() > 0.01);
        let options = SheetOptions {
            close_threshold: Some(threshold),
            ..Default::default()
        };
        let script = drag::parse_script(&format!("handle@0:0,10000:{}", travel)).unwrap();
        let report = drag::simulate(&options, &script).unwrap();
        let expected = if travel > threshold.max(120.0) {
            DragOutcome::Dismiss
        } else {
            DragOutcome::SnapBack
        };
        prop_assert_eq!(report.replay.decision.unwrap().outcome, expected);
        prop_assert_eq!(report.still_open, expected == DragOutcome::SnapBack);
    }

    /// The pad never emits more than one confirmation per open
    #[test]
    fn test_pin_confirms_at_most_once(keys in "[0-9<]{0,40}", length in 4i64..=12) {
        let options = SheetOptions {
            password_length: Some(length),
            ..Default::default()
        };
        let report = pin::enter_keys(&options, 1.0, &keys).unwrap();
        let confirms = report
            .events
            .iter()
            .filter(|e| matches!(e, paysheet_lib::SheetEvent::Confirm(_)))
            .count();
        prop_assert!(confirms <= 1);
        prop_assert_eq!(confirms == 1, !report.still_open);
        prop_assert!(report.filled < length as usize);
    }
}
