//! Error taxonomy shared by the conversion engine, the currency pipeline,
//! the form-field contract and the backend client.
//!
//! Every variant is serializable so a frontend shell can render it directly.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Input is empty, unparseable, NaN or infinite.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A unit or currency symbol is missing from the table in use.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// A unit or currency table was built with a repeated symbol.
    #[error("Duplicate symbol in table: {0}")]
    DuplicateSymbol(String),

    /// The exchange-rate source failed, timed out, or omitted the quote currency.
    #[error("Rate unavailable: {0}")]
    RateUnavailable(String),

    /// Caller broke the form-field contract (duplicate option values, ...).
    #[error("Field contract violation: {0}")]
    FieldContract(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Validation Error: {0}")]
    Validation(String),
}

impl AppError {
    /// Errors a page is expected to surface as a visible notice.
    ///
    /// Contract violations and duplicate table symbols are programming errors
    /// and never reach end users.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AppError::FieldContract(_) | AppError::DuplicateSymbol(_))
    }

    /// Neutral message shown in place of a result that could not be produced.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::InvalidValue(_) => "Enter a valid number",
            AppError::UnknownUnit(_) => "Conversion unavailable",
            AppError::RateUnavailable(_) | AppError::Network(_) | AppError::Api { .. } => {
                "Exchange rate unavailable. Try again later."
            }
            _ => "Something went wrong",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(AppError::UnknownUnit("xx".into())).unwrap();
        assert_eq!(json["type"], "UnknownUnit");
        assert_eq!(json["message"], "xx");
    }

    #[test]
    fn test_contract_errors_are_not_user_visible() {
        assert!(!AppError::FieldContract("dup".into()).is_user_visible());
        assert!(!AppError::DuplicateSymbol("m".into()).is_user_visible());
        assert!(AppError::RateUnavailable("timeout".into()).is_user_visible());
    }

    #[test]
    fn test_user_message_for_rate_failures() {
        let msg = AppError::Api { status: 500, message: "boom".into() }.user_message();
        assert_eq!(msg, AppError::RateUnavailable(String::new()).user_message());
    }
}
