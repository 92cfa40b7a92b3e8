//! Tool configuration registry
//!
//! Per-page display defaults keyed by catalog tool id. Precision only affects
//! presentation; the engines always work on full `f64` values.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::shared::settings::AppSettings;

/// Display defaults for one tool page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ToolConfig {
    pub precision: u32,
    pub default_value: String,
    pub default_from: String,
    pub default_to: String,
}

impl ToolConfig {
    pub fn new(precision: u32, default_from: impl Into<String>, default_to: impl Into<String>) -> Self {
        Self {
            precision,
            default_value: "1".to_string(),
            default_from: default_from.into(),
            default_to: default_to.into(),
        }
    }
}

const TOOL_IDS: [&str; 7] = [
    "length-converter",
    "weight-converter",
    "volume-converter",
    "speed-converter",
    "area-converter",
    "currency-converter",
    "text-case-converter",
];

/// Configuration for a tool page, falling back to neutral defaults for unknown ids.
///
/// Precision and the length/currency pairs come from the user's settings.
pub fn tool_config(settings: &AppSettings, tool_id: &str) -> ToolConfig {
    let prefs = &settings.preferences;
    let units = settings.precision.units;
    match tool_id {
        "length-converter" => ToolConfig::new(units, &prefs.default_length_from, &prefs.default_length_to),
        "weight-converter" => ToolConfig::new(units, "kg", "lb"),
        "volume-converter" => ToolConfig::new(units, "L", "gal"),
        "speed-converter" => ToolConfig::new(units, "km/h", "mph"),
        "area-converter" => ToolConfig::new(units, "m²", "ft²"),
        "currency-converter" => ToolConfig::new(
            settings.precision.currency,
            &prefs.default_currency_from,
            &prefs.default_currency_to,
        ),
        "text-case-converter" => ToolConfig {
            default_value: String::new(),
            ..ToolConfig::new(0, "", "UPPERCASE")
        },
        _ => ToolConfig::new(units, "", ""),
    }
}

/// Every configured tool (for debugging/admin)
pub fn all_tool_configs(settings: &AppSettings) -> Vec<(&'static str, ToolConfig)> {
    TOOL_IDS.iter().map(|id| (*id, tool_config(settings, id))).collect()
}
