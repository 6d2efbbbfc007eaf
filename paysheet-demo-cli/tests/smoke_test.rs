//! Smoke tests for paysheet-demo-cli
//!
//! Run the built binary without a terminal attached.

use std::process::Command;

fn demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_paysheet-demo"))
}

/// Test that the CLI can show help
#[test]
fn test_cli_help() {
    let output = demo().arg("--help").output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["drag", "pin", "config", "checkout"] {
        assert!(stdout.contains(command), "Help should mention '{}'", command);
    }
}

/// Test that config prints the effective values as JSON
#[test]
fn test_cli_config_json() {
    let output = demo()
        .args(["config", "--json", "--password-length", "99", "--header-title", "Pay"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["config"]["passwordLength"], 12);
    assert_eq!(value["config"]["headerTitle"], "Pay");
    assert_eq!(value["methods"].as_array().unwrap().len(), 3);
}

/// Test that a bad gesture script exits with an error
#[test]
fn test_cli_drag_rejects_bad_script() {
    let output = demo()
        .args(["drag", "handle@0:zero"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid samples"));
}

/// Test that a scripted checkout confirms with the chosen method
#[test]
fn test_cli_checkout_auto() {
    let output = demo()
        .args(["checkout", "--amount", "12", "--auto", "1"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("payment-confirm method=alipay amount=12.00"));
    assert!(stdout.contains("payment-close"));
}
