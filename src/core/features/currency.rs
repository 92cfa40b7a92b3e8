//! Currency converter feature
//!
//! `CurrencyConverter` owns the page's result area. Every conversion request is
//! numbered; a response is applied only while its number is still the latest,
//! so a slow answer for old inputs never overwrites a newer one.

pub mod service;
pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use self::service::{lookup_rate, parse_fuzzy_amount, RateSource};
use self::types::{normalize_code, CurrencyDisplay, CurrencyQuote, ExchangeRate};
use super::unit_converter::{convert_with_rate, format_fixed, parse_value};
use super::{FeatureAsync, FeatureSync};
use crate::core::catalog::ToolCategory;
use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::{ERR_CANNOT_PARSE_AMOUNT, ERR_MISSING_TEXT_PARAM, ERR_UNSUPPORTED_ACTION};
use crate::shared::settings::AppSettings;
use crate::shared::types::{
    ActionType, ConvertCurrencyRequest, ConvertCurrencyResponse, ExecuteActionResponse, QuickAction,
};

pub struct CurrencyConverter<S> {
    source: S,
    timeout: Duration,
    generation: AtomicU64,
    display: Mutex<CurrencyDisplay>,
}

impl<S: RateSource> CurrencyConverter<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            generation: AtomicU64::new(0),
            display: Mutex::new(CurrencyDisplay::Idle),
        }
    }

    /// Snapshot of what the page currently shows
    pub fn display(&self) -> CurrencyDisplay {
        self.lock_display().clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Convert `amount_text` from one currency to another.
    ///
    /// Returns the state this request produced, or `None` when a newer request
    /// was issued before it finished and its result was discarded.
    pub async fn convert(&self, amount_text: &str, from: &str, to: &str) -> Option<CurrencyDisplay> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let amount = match parse_value(amount_text) {
            Ok(v) => v,
            Err(reason) => return self.apply(generation, CurrencyDisplay::Unavailable { reason }),
        };

        let from = normalize_code(from);
        let to = normalize_code(to);

        if from == to {
            let quote = CurrencyQuote {
                amount,
                result: amount,
                rate: ExchangeRate {
                    base: from,
                    quote: to,
                    rate: 1.0,
                    fetched_at: Utc::now(),
                },
            };
            return self.apply(generation, CurrencyDisplay::Ready(quote));
        }

        self.apply(generation, CurrencyDisplay::Loading { generation })?;

        let next = match self.fetch_quote(amount, &from, &to).await {
            Ok(quote) => CurrencyDisplay::Ready(quote),
            Err(reason) => {
                tracing::warn!(%from, %to, error = %reason, "exchange rate unavailable");
                CurrencyDisplay::Unavailable { reason }
            }
        };

        let applied = self.apply(generation, next);
        if applied.is_none() {
            tracing::debug!(generation, latest = self.latest_generation(), "discarding stale rate response");
        }
        applied
    }

    /// Clear a visible notice. Only an `Unavailable` state is reset.
    pub fn dismiss(&self) {
        let mut display = self.lock_display();
        if matches!(*display, CurrencyDisplay::Unavailable { .. }) {
            *display = CurrencyDisplay::Idle;
        }
    }

    async fn fetch_quote(&self, amount: f64, from: &str, to: &str) -> AppResult<CurrencyQuote> {
        let payload = tokio::time::timeout(self.timeout, self.source.fetch_rates(from))
            .await
            .map_err(|_| AppError::RateUnavailable(format!("rate request timed out after {:?}", self.timeout)))?
            .map_err(|e| match e {
                AppError::RateUnavailable(_) => e,
                other => AppError::RateUnavailable(other.to_string()),
            })?;

        let rate = lookup_rate(&payload, from, to, Utc::now())?;
        let result = convert_with_rate(amount, rate.rate)?;
        Ok(CurrencyQuote { amount, result, rate })
    }

    fn apply(&self, generation: u64, next: CurrencyDisplay) -> Option<CurrencyDisplay> {
        let mut display = self.lock_display();
        if generation != self.generation.load(Ordering::SeqCst) {
            return None;
        }
        *display = next.clone();
        Some(next)
    }

    fn lock_display(&self) -> MutexGuard<'_, CurrencyDisplay> {
        self.display.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exchange the two selectors; the amount stays as typed.
pub fn swap(from: &str, to: &str) -> (String, String) {
    (to.to_string(), from.to_string())
}

// ============================================================================
// Feature Implementation
// ============================================================================

const QUICK_TARGETS: [&str; 10] = ["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR", "MXN"];

#[derive(Clone)]
pub struct CurrencyFeature {
    source: Arc<dyn RateSource>,
    timeout: Duration,
}

impl CurrencyFeature {
    pub fn new(source: Arc<dyn RateSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }
}

impl FeatureSync for CurrencyFeature {
    fn id(&self) -> &str {
        "currency"
    }

    fn tool_ids(&self) -> Vec<&'static str> {
        vec!["currency-converter"]
    }

    fn quick_actions(&self) -> Vec<QuickAction> {
        QUICK_TARGETS
            .iter()
            .map(|code| {
                let name = types::COMMON_CURRENCIES
                    .get(code)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| code.to_string());
                QuickAction {
                    id: format!("convert_{}", code.to_lowercase()),
                    label: format!("Convert to {} ({})", name, code),
                    description: None,
                    action_type: ActionType::ConvertCurrency {
                        target: code.to_string(),
                    },
                    tool_id: Some("currency-converter".to_string()),
                    category: Some(ToolCategory::Finance),
                }
            })
            .collect()
    }
}

#[async_trait]
impl FeatureAsync for CurrencyFeature {
    async fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        let ActionType::ConvertCurrency { target } = action else {
            return Err(AppError::Validation(ERR_UNSUPPORTED_ACTION.to_string()));
        };

        let text = params
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Validation(ERR_MISSING_TEXT_PARAM.to_string()))?;

        let (amount, from) = parse_fuzzy_amount(text)
            .ok_or_else(|| AppError::InvalidValue(format!("{}: {}", ERR_CANNOT_PARSE_AMOUNT, text)))?;

        let converter = CurrencyConverter::new(self.source.clone(), self.timeout);
        let quote = match converter.convert(&amount.to_string(), &from, target).await {
            Some(CurrencyDisplay::Ready(quote)) => quote,
            Some(CurrencyDisplay::Unavailable { reason }) => return Err(reason),
            _ => return Err(AppError::RateUnavailable("conversion did not complete".to_string())),
        };

        Ok(ExecuteActionResponse {
            result: format!("{} {}", format_fixed(quote.result, 2), quote.rate.quote),
            metadata: Some(serde_json::json!({
                "from": quote.rate.base,
                "to": quote.rate.quote,
                "amount": quote.amount,
                "rate": quote.rate.rate,
                "last_updated": quote.last_updated().to_rfc3339(),
            })),
        })
    }
}

/// One-shot conversion for a frontend shell, formatted with the user's precision settings.
pub async fn convert_currency_command<S: RateSource>(
    source: S,
    settings: &AppSettings,
    request: ConvertCurrencyRequest,
) -> AppResult<ConvertCurrencyResponse> {
    let converter = CurrencyConverter::new(source, settings.timeout());
    match converter.convert(&request.amount, &request.from, &request.to).await {
        Some(CurrencyDisplay::Ready(quote)) => Ok(ConvertCurrencyResponse {
            result: quote.formatted_result(settings.precision.currency),
            rate: format_fixed(quote.rate.rate, settings.precision.rate),
            last_updated: quote.last_updated().to_rfc3339(),
        }),
        Some(CurrencyDisplay::Unavailable { reason }) => Err(reason),
        _ => Err(AppError::RateUnavailable("conversion did not complete".to_string())),
    }
}
