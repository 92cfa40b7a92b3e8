use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::core::catalog::ToolCategory;
use crate::core::features::text_case::CaseStyle;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConvertUnitsRequest {
    /// Raw user input; parsed with the same rules as the converter pages.
    pub amount: String,
    pub from_unit: String,
    pub to_unit: String,
    pub category: String,
    pub precision: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConvertUnitsResponse {
    pub result: f64,
    pub formatted_result: String,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct GetUnitsResponse {
    pub units: Vec<UnitDTO>,
}

// Unit entry for selector population
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct UnitDTO {
    pub id: String,       // Unit symbol (e.g., "m", "kg")
    pub label: String,    // Display name (e.g., "Meters", "Kilograms")
    pub category: String, // Category (e.g., "length", "mass")
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConvertCurrencyRequest {
    pub amount: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConvertCurrencyResponse {
    pub result: String,
    pub rate: String,
    /// RFC 3339 time the rate was fetched
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct CaseConvertRequest {
    pub text: String,
    pub style: CaseStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct CaseConvertResponse {
    pub result: String,
    pub input_stats: TextAnalysisResponse,
    pub output_stats: TextAnalysisResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct TextAnalysisRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct TextAnalysisResponse {
    pub word_count: usize,
    pub char_count: usize,
    pub char_count_no_spaces: usize,
    pub grapheme_count: usize,
    pub line_count: usize,
    pub reading_time_sec: f64,
}

// Quick actions, adjacently tagged for the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload")]
#[ts(export, export_to = "bindings.ts")]
pub enum ActionType {
    /// Convert a free-text quantity ("12 km") into `target`
    ConvertUnit { target: String },
    /// Convert a fuzzy amount ("$10") into the `target` currency code
    ConvertCurrency { target: String },
    ChangeCase(CaseStyle),
    AnalyzeText,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct QuickAction {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub action_type: ActionType,
    /// Catalog entry that owns the full page for this action
    pub tool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ToolCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ExecuteActionRequest {
    pub action_type: ActionType,
    #[ts(type = "any")]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ExecuteActionResponse {
    pub result: String,
    #[ts(type = "any")]
    pub metadata: Option<serde_json::Value>,
}
