use crate::core::catalog::ToolCategory;
use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::{ERR_MISSING_TEXT_PARAM, ERR_UNSUPPORTED_ACTION};
use crate::shared::types::{
    ActionType, ExecuteActionResponse, QuickAction, TextAnalysisRequest, TextAnalysisResponse,
};
use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

// Average reading speed in words per minute
const READING_WPM: f64 = 200.0;

#[derive(Clone)]
pub struct TextAnalyserFeature;

impl super::FeatureSync for TextAnalyserFeature {
    fn id(&self) -> &str {
        "text_analyser"
    }

    fn tool_ids(&self) -> Vec<&'static str> {
        vec!["text-case-converter"]
    }

    fn quick_actions(&self) -> Vec<QuickAction> {
        vec![QuickAction {
            id: "analyze_text".to_string(),
            label: "Analyze Text".to_string(),
            description: Some("Count words and characters, estimate reading time".to_string()),
            action_type: ActionType::AnalyzeText,
            tool_id: Some("text-case-converter".to_string()),
            category: Some(ToolCategory::TextTools),
        }]
    }
}

#[async_trait]
impl super::FeatureAsync for TextAnalyserFeature {
    async fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        if !matches!(action, ActionType::AnalyzeText) {
            return Err(AppError::Validation(ERR_UNSUPPORTED_ACTION.to_string()));
        }

        let text = params
            .get("text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| AppError::Validation(ERR_MISSING_TEXT_PARAM.to_string()))?;

        let analysis = analyse(text);
        let result = format!(
            "{} words, {} chars, {}",
            analysis.word_count,
            analysis.char_count,
            format_reading_time(analysis.reading_time_sec)
        );

        Ok(ExecuteActionResponse {
            result,
            metadata: Some(serde_json::to_value(analysis)?),
        })
    }
}

/// Character and word counters shown beside the case converter.
///
/// Words are whitespace-separated runs of the trimmed text, so blank input
/// has zero words. Characters are Unicode scalar values.
pub fn analyse(text: &str) -> TextAnalysisResponse {
    let trimmed = text.trim();
    let word_count = if trimmed.is_empty() {
        0
    } else {
        trimmed.split_whitespace().count()
    };
    let char_count = text.chars().count();
    let char_count_no_spaces = text.chars().filter(|c| !c.is_whitespace()).count();
    let grapheme_count = text.graphemes(true).count();
    let line_count = text.lines().count();

    let reading_time_sec = if word_count > 0 {
        (word_count as f64 / READING_WPM) * 60.0
    } else {
        0.0
    };

    TextAnalysisResponse {
        word_count,
        char_count,
        char_count_no_spaces,
        grapheme_count,
        line_count,
        reading_time_sec,
    }
}

fn format_reading_time(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor();
    let secs = (seconds % 60.0).round();
    if mins > 0.0 {
        format!("~{} min {} sec", mins, secs)
    } else {
        format!("~{} sec", secs)
    }
}

pub async fn analyze_text_command(request: TextAnalysisRequest) -> AppResult<TextAnalysisResponse> {
    Ok(analyse(&request.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::FeatureAsync;

    #[test]
    fn test_blank_text_has_no_words() {
        let stats = analyse("   \n\t ");
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.reading_time_sec, 0.0);
        assert_eq!(stats.char_count, 6);
        assert_eq!(stats.char_count_no_spaces, 0);
    }

    #[test]
    fn test_counts() {
        let stats = analyse("Hello World!\nsecond line");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 24);
        assert_eq!(stats.char_count_no_spaces, 21);
        assert_eq!(stats.line_count, 2);
    }

    #[test]
    fn test_graphemes_differ_from_chars() {
        // "e" + combining acute accent
        let stats = analyse("cafe\u{301}");
        assert_eq!(stats.char_count, 5);
        assert_eq!(stats.grapheme_count, 4);
    }

    #[test]
    fn test_reading_time() {
        let text = vec!["word"; 300].join(" ");
        let stats = analyse(&text);
        assert_eq!(stats.reading_time_sec, 90.0);
        assert_eq!(format_reading_time(stats.reading_time_sec), "~1 min 30 sec");
    }

    #[tokio::test]
    async fn test_execute_action() {
        let response = TextAnalyserFeature
            .execute_action(&ActionType::AnalyzeText, &serde_json::json!({ "text": "one two three" }))
            .await
            .unwrap();
        assert!(response.result.starts_with("3 words, 13 chars"));
        assert_eq!(response.metadata.unwrap()["word_count"], 3);
    }

    #[tokio::test]
    async fn test_rejects_other_actions() {
        let err = TextAnalyserFeature
            .execute_action(&ActionType::ConvertUnit { target: "m".into() }, &serde_json::json!({ "text": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation(ERR_UNSUPPORTED_ACTION.to_string()));
    }
}
