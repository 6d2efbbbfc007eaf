//! Integration tests for the CLI commands
//!
//! Drive the library-exposed command functions with config and method files
//! written to a temporary directory.

use paysheet_demo_cli::commands::checkout::{self, Decision};
use paysheet_demo_cli::commands::{config, drag, pin, SheetOptions};
use paysheet_lib::events::SheetEvent;
use paysheet_lib::gesture::DragOutcome;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary directory holding config and method files
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, value: serde_json::Value) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }
}

#[test]
fn test_config_file_drives_threshold() {
    let ctx = TestContext::new();
    let options = SheetOptions {
        config: Some(ctx.write("sheet.json", json!({ "closeThreshold": 50, "closeThresholdPercent": 0.1 }))),
        ..Default::default()
    };

    // 400px panel: effective distance is max(50, 40) = 50
    let past = drag::parse_script("header@0:0,500:55").unwrap();
    let report = drag::simulate(&options, &past).unwrap();
    let decision = report.replay.decision.unwrap();
    assert_eq!(decision.threshold, 50.0);
    assert_eq!(decision.outcome, DragOutcome::Dismiss);

    let short = drag::parse_script("header@0:0,500:45").unwrap();
    let report = drag::simulate(&options, &short).unwrap();
    assert_eq!(report.replay.decision.unwrap().outcome, DragOutcome::SnapBack);
    assert!(report.still_open);
    assert!(report.events.is_empty());
}

#[test]
fn test_distance_rule_at_default_thresholds() {
    let options = SheetOptions::default();
    for (travel, dismissed) in [(130.0, true), (110.0, false)] {
        let script = drag::parse_script(&format!("handle@0:0,1000:{}", travel)).unwrap();
        let report = drag::simulate(&options, &script).unwrap();
        assert_eq!(!report.still_open, dismissed, "travel {}", travel);
    }
}

#[test]
fn test_flick_direction_decides() {
    let options = SheetOptions::default();

    let down = drag::parse_script("surface@0:0,10:10,22:20").unwrap();
    assert!(!drag::simulate(&options, &down).unwrap().still_open);

    let reversed = drag::parse_script("surface@0:0,10:40,20:20").unwrap();
    assert!(drag::simulate(&options, &reversed).unwrap().still_open);
}

#[test]
fn test_methods_file_with_mapping() {
    let ctx = TestContext::new();
    let options = SheetOptions {
        methods: Some(ctx.write(
            "methods.json",
            json!({
                "methods": [{ "code": "usdt", "label": "Tether" }, { "id": 7, "name": "X" }],
                "mapping": { "title": "label", "identity": "code" }
            }),
        )),
        ..Default::default()
    };

    let (_, methods) = config::effective(&options).unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].title, "Tether");
    assert_eq!(methods[0].identity, json!("usdt"));

    let events = checkout::scripted(&options, 5.0, 0, &Decision::Confirm).unwrap();
    match &events[0] {
        SheetEvent::Confirm(c) => {
            assert_eq!(c.method, json!("usdt"));
            assert_eq!(c.method_data, json!({ "code": "usdt", "label": "Tether" }));
        }
        other => panic!("expected a confirmation, got {:?}", other),
    }
}

#[test]
fn test_methods_file_as_plain_list() {
    let ctx = TestContext::new();
    let options = SheetOptions {
        methods: Some(ctx.write("methods.json", json!([{ "id": 7, "name": "X" }]))),
        ..Default::default()
    };
    let (_, methods) = config::effective(&options).unwrap();
    assert_eq!(methods[0].identity, json!(7));
    assert_eq!(methods[0].title, "X");
    assert_eq!(methods[0].subtitle, "");
}

#[test]
fn test_malformed_config_file_is_reported() {
    let ctx = TestContext::new();
    let path = ctx.temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let options = SheetOptions {
        config: Some(path),
        ..Default::default()
    };
    let err = config::effective(&options).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn test_pin_uses_configured_length() {
    let ctx = TestContext::new();
    let options = SheetOptions {
        config: Some(ctx.write("sheet.json", json!({ "passwordLength": 6 }))),
        ..Default::default()
    };
    let report = pin::enter_keys(&options, 9.99, "1234").unwrap();
    assert!(report.still_open);
    assert_eq!(report.filled, 4);

    let report = pin::enter_keys(&options, 9.99, "123456").unwrap();
    assert!(!report.still_open);
    match &report.events[0] {
        SheetEvent::Confirm(c) => {
            assert_eq!(c.password.as_deref(), Some("123456"));
            assert_eq!(c.amount, "9.99");
        }
        other => panic!("expected a confirmation, got {:?}", other),
    }
}
