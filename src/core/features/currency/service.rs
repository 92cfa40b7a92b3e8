use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::types::{normalize_code, ExchangeRate, RatesPayload, COMMON_CURRENCIES};
use crate::core::features::unit_converter::parse_number_token;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

/// Anything that can produce a rate table for a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> AppResult<RatesPayload>;
}

#[async_trait]
impl<T: RateSource + ?Sized> RateSource for Arc<T> {
    async fn fetch_rates(&self, base: &str) -> AppResult<RatesPayload> {
        (**self).fetch_rates(base).await
    }
}

/// Rate source backed by an HTTP endpoint serving `GET {rates_url}/{BASE}`.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    http: Client,
    rates_url: String,
}

impl HttpRateSource {
    pub fn new(rates_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("convertall/currency")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            rates_url: rates_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        Self::new(settings.api.rates_url.clone(), settings.timeout())
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &str) -> AppResult<RatesPayload> {
        let url = format!("{}/{}", self.rates_url, urlencoding::encode(&normalize_code(base)));
        tracing::debug!(%url, "fetching exchange rates");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::RateUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, %url, "rate source returned an error status");
            return Err(AppError::RateUnavailable(format!("rate source returned {}", status)));
        }

        response
            .json::<RatesPayload>()
            .await
            .map_err(|e| AppError::RateUnavailable(format!("invalid rate payload: {}", e)))
    }
}

/// Pick `quote` out of a rate table for `base`.
pub fn lookup_rate(
    payload: &RatesPayload,
    base: &str,
    quote: &str,
    fetched_at: DateTime<Utc>,
) -> AppResult<ExchangeRate> {
    let base = normalize_code(base);
    let quote = normalize_code(quote);

    match payload.rates.get(&quote) {
        Some(&rate) if rate.is_finite() && rate > 0.0 => Ok(ExchangeRate {
            base,
            quote,
            rate,
            fetched_at,
        }),
        Some(&rate) => Err(AppError::RateUnavailable(format!(
            "{} rate for {} is not usable: {}",
            quote, base, rate
        ))),
        None => Err(AppError::RateUnavailable(format!("no {} rate in the {} table", quote, base))),
    }
}

static RE_FUZZY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([^\d\.,]*)([\d\.,]+)([^\d\.,]*)$").expect("Failed to compile amount pattern")
});

/// Fuzzy parse strings with prefix/suffix markers and commas: "$10", "1euro", "€5", "1,200 jpy".
///
/// Commas follow the same rule as unit quantities. Unknown or missing markers default to USD.
pub fn parse_fuzzy_amount(input: &str) -> Option<(f64, String)> {
    let caps = RE_FUZZY_AMOUNT.captures(input.trim())?;
    let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim();
    let amount = parse_number_token(caps.get(2)?.as_str())?;
    let suffix = caps.get(3).map(|m| m.as_str()).unwrap_or("").trim();

    let currency = map_token(suffix)
        .or_else(|| map_token(prefix))
        .or_else(|| known_code(prefix))
        .or_else(|| known_code(suffix))
        .unwrap_or_else(|| "USD".to_string());

    Some((amount, currency))
}

fn map_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }
    let code = match token.as_str() {
        "$" | "usd" | "dollar" | "dollars" => "USD",
        "€" | "eur" | "euro" | "euros" => "EUR",
        "£" | "gbp" | "pound" | "pounds" | "british pound" => "GBP",
        "¥" | "jpy" | "yen" => "JPY",
        "₹" | "inr" | "rupee" | "rupees" => "INR",
        _ => return None,
    };
    Some(code.to_string())
}

fn known_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        COMMON_CURRENCIES.get(code).map(|c| c.code.clone())
    } else {
        None
    }
}
