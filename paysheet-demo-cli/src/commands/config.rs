//! Config command - show the effective sheet configuration

use anyhow::Result;
use paysheet_lib::{MethodDisplay, SheetConfig};

use super::SheetOptions;
use crate::ui;

/// The configuration and method rows a sheet built from `options` would use.
pub fn effective(options: &SheetOptions) -> Result<(SheetConfig, Vec<MethodDisplay>)> {
    let sheet = options.build_sheet()?;
    Ok((sheet.config().clone(), sheet.registry().displays()))
}

pub fn run(options: &SheetOptions, json: bool) -> Result<()> {
    let (config, methods) = effective(options)?;

    if json {
        ui::json(&serde_json::json!({
            "config": config,
            "methods": methods,
            "panelHeight": options.panel_height(),
        }));
        return Ok(());
    }

    ui::header("Sheet Configuration");
    ui::key_value("Header title", &config.header_title);
    ui::key_value("Swipe to close", &config.allow_swipe_to_close.to_string());
    ui::key_value("Close on overlay click", &config.close_on_overlay_click.to_string());
    ui::key_value("Password mode", &config.enable_password.to_string());
    ui::key_value("Password length", &config.password_length.to_string());
    ui::key_value("Close threshold", &format!("{}px", config.close_threshold));
    ui::key_value(
        "Close threshold percent",
        &format!("{:.0}%", config.close_threshold_percent * 100.0),
    );
    ui::key_value("Velocity threshold", &format!("{}px/ms", config.velocity_threshold));

    let height = options.panel_height();
    ui::key_value(
        "Effective close distance",
        &format!("{:.1}px at {}px", config.thresholds().effective_distance(height), height),
    );

    ui::header("Payment Methods");
    for method in &methods {
        let subtitle = if method.subtitle.is_empty() {
            String::new()
        } else {
            format!(" ({})", method.subtitle)
        };
        println!("  {} {} [{}]{}", method.icon, method.title, method.identity, subtitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (config, methods) = effective(&SheetOptions::default()).unwrap();
        assert_eq!(config, SheetConfig::default());
        assert_eq!(methods.len(), 3);
    }

    #[test]
    fn test_flags_are_clamped() {
        let options = SheetOptions {
            password_length: Some(2),
            close_threshold_percent: Some(1.5),
            ..Default::default()
        };
        let (config, _) = effective(&options).unwrap();
        assert_eq!(config.password_length, 4);
        assert_eq!(config.close_threshold_percent, 1.0);
    }
}
