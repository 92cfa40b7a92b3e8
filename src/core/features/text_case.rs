//! Text-case transforms for the case converter page.
//!
//! Word boundaries are runs of characters outside `[a-zA-Z0-9]`, so non-ASCII
//! letters act as separators in the joined styles (snake, kebab, dot, ...).

use crate::core::catalog::ToolCategory;
use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::{ERR_MISSING_TEXT_PARAM, ERR_UNSUPPORTED_ACTION};
use crate::shared::types::{
    ActionType, CaseConvertRequest, CaseConvertResponse, ExecuteActionResponse, QuickAction,
};
use super::text_analyser::analyse;
use super::{FeatureAsync, FeatureSync};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings.ts")]
pub enum CaseStyle {
    Upper,
    Lower,
    Title,
    Sentence,
    Camel,
    Pascal,
    Snake,
    Kebab,
    UpperSnake,
    Alternating,
    Inverse,
    Dot,
}

impl CaseStyle {
    pub fn all() -> [CaseStyle; 12] {
        use CaseStyle::*;
        [
            Upper, Lower, Title, Sentence, Camel, Pascal, Snake, Kebab, UpperSnake, Alternating, Inverse,
            Dot,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            CaseStyle::Upper => "upper",
            CaseStyle::Lower => "lower",
            CaseStyle::Title => "title",
            CaseStyle::Sentence => "sentence",
            CaseStyle::Camel => "camel",
            CaseStyle::Pascal => "pascal",
            CaseStyle::Snake => "snake",
            CaseStyle::Kebab => "kebab",
            CaseStyle::UpperSnake => "upper_snake",
            CaseStyle::Alternating => "alternating",
            CaseStyle::Inverse => "inverse",
            CaseStyle::Dot => "dot",
        }
    }

    /// Label as shown on the style picker; each label is written in its own style
    pub fn label(&self) -> &'static str {
        match self {
            CaseStyle::Upper => "UPPERCASE",
            CaseStyle::Lower => "lowercase",
            CaseStyle::Title => "Title Case",
            CaseStyle::Sentence => "Sentence case",
            CaseStyle::Camel => "camelCase",
            CaseStyle::Pascal => "PascalCase",
            CaseStyle::Snake => "snake_case",
            CaseStyle::Kebab => "kebab-case",
            CaseStyle::UpperSnake => "UPPER_SNAKE_CASE",
            CaseStyle::Alternating => "Alternating Case",
            CaseStyle::Inverse => "InVeRsE cAsE",
            CaseStyle::Dot => "dot.case",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CaseStyle::Upper => "Convert all characters to uppercase",
            CaseStyle::Lower => "Convert all characters to lowercase",
            CaseStyle::Title => "Capitalize the first letter of each word",
            CaseStyle::Sentence => "Capitalize the first letter of each sentence",
            CaseStyle::Camel => "Convert to camelCase format",
            CaseStyle::Pascal => "Convert to PascalCase format",
            CaseStyle::Snake => "Convert to snake_case format",
            CaseStyle::Kebab => "Convert to kebab-case format",
            CaseStyle::UpperSnake => "Convert to UPPER_SNAKE_CASE format",
            CaseStyle::Alternating => "Alternate between uppercase and lowercase",
            CaseStyle::Inverse => "Invert the case of each character",
            CaseStyle::Dot => "Convert to dot.case format",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseStyle {
    type Err = AppError;

    /// Accepts either the id ("upper_snake") or the picker label ("UPPER_SNAKE_CASE").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CaseStyle::all()
            .into_iter()
            .find(|style| style.id() == s || style.label() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown case style: {}", s)))
    }
}

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]\S*").expect("Failed to compile word pattern"));
static RE_SENTENCE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]|\.\s+[A-Za-z0-9_]").expect("Failed to compile sentence pattern")
});
static RE_SEPARATOR_THEN_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+(.)").expect("Failed to compile separator pattern"));
static RE_NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Failed to compile separator pattern"));
static RE_NON_UPPER_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Z0-9]+").expect("Failed to compile separator pattern"));

/// Convert `text` into `style`. Blank input yields an empty string.
pub fn convert_case(text: &str, style: CaseStyle) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    match style {
        CaseStyle::Upper => text.to_uppercase(),
        CaseStyle::Lower => text.to_lowercase(),
        CaseStyle::Title => to_title_case(text),
        CaseStyle::Sentence => to_sentence_case(text),
        CaseStyle::Camel => to_camel_case(text),
        CaseStyle::Pascal => to_pascal_case(text),
        CaseStyle::Snake => to_snake_case(text),
        CaseStyle::Kebab => to_kebab_case(text),
        CaseStyle::UpperSnake => to_upper_snake_case(text),
        CaseStyle::Alternating => to_alternating_case(text),
        CaseStyle::Inverse => to_inverse_case(text),
        CaseStyle::Dot => to_dot_case(text),
    }
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// Replace each separator run with `sep`, then drop one leading and one trailing `sep`.
fn join_with(text: &str, separators: &Regex, sep: char) -> String {
    let replaced = separators.replace_all(text, sep.to_string().as_str());
    let joined: &str = &replaced;
    let joined = joined.strip_prefix(sep).unwrap_or(joined);
    joined.strip_suffix(sep).unwrap_or(joined).to_string()
}

fn upper_after_separators(text: &str) -> String {
    RE_SEPARATOR_THEN_CHAR
        .replace_all(text, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

pub fn to_title_case(text: &str) -> String {
    RE_WORD
        .replace_all(text, |caps: &Captures| capitalize_word(&caps[0]))
        .into_owned()
}

pub fn to_sentence_case(text: &str) -> String {
    RE_SENTENCE_START
        .replace_all(&text.to_lowercase(), |caps: &Captures| caps[0].to_uppercase())
        .into_owned()
}

pub fn to_camel_case(text: &str) -> String {
    upper_after_separators(&text.to_lowercase())
}

pub fn to_pascal_case(text: &str) -> String {
    upper_after_separators(&to_title_case(text))
}

pub fn to_snake_case(text: &str) -> String {
    join_with(&text.to_lowercase(), &RE_NON_ALNUM, '_')
}

pub fn to_kebab_case(text: &str) -> String {
    join_with(&text.to_lowercase(), &RE_NON_ALNUM, '-')
}

pub fn to_upper_snake_case(text: &str) -> String {
    join_with(&text.to_uppercase(), &RE_NON_UPPER_ALNUM, '_')
}

pub fn to_dot_case(text: &str) -> String {
    join_with(&text.to_lowercase(), &RE_NON_ALNUM, '.')
}

/// Even positions upper, odd positions lower, counting every character.
pub fn to_alternating_case(text: &str) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, c)| -> Box<dyn Iterator<Item = char>> {
            if i % 2 == 0 {
                Box::new(c.to_uppercase())
            } else {
                Box::new(c.to_lowercase())
            }
        })
        .collect()
}

pub fn to_inverse_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let upper: String = c.to_uppercase().collect();
        if upper.chars().eq(std::iter::once(c)) {
            out.extend(c.to_lowercase());
        } else {
            out.push_str(&upper);
        }
    }
    out
}

// ============================================================================
// Feature Implementation
// ============================================================================

#[derive(Clone)]
pub struct TextCaseFeature;

impl FeatureSync for TextCaseFeature {
    fn id(&self) -> &str {
        "text_case"
    }

    fn tool_ids(&self) -> Vec<&'static str> {
        vec!["text-case-converter"]
    }

    fn quick_actions(&self) -> Vec<QuickAction> {
        CaseStyle::all()
            .into_iter()
            .map(|style| QuickAction {
                id: format!("case_{}", style.id()),
                label: style.label().to_string(),
                description: Some(style.description().to_string()),
                action_type: ActionType::ChangeCase(style),
                tool_id: Some("text-case-converter".to_string()),
                category: Some(ToolCategory::TextTools),
            })
            .collect()
    }
}

#[async_trait]
impl FeatureAsync for TextCaseFeature {
    async fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        let ActionType::ChangeCase(style) = action else {
            return Err(AppError::Validation(ERR_UNSUPPORTED_ACTION.to_string()));
        };

        let text = params
            .get("text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| AppError::Validation(ERR_MISSING_TEXT_PARAM.to_string()))?;

        Ok(ExecuteActionResponse {
            result: convert_case(text, *style),
            metadata: Some(serde_json::json!({ "style": style.id() })),
        })
    }
}

pub async fn convert_case_command(request: CaseConvertRequest) -> AppResult<CaseConvertResponse> {
    let result = convert_case(&request.text, request.style);
    tracing::debug!(style = request.style.id(), input_len = request.text.len(), "case conversion");

    Ok(CaseConvertResponse {
        input_stats: analyse(&request.text),
        output_stats: analyse(&result),
        result,
    })
}
