use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::features::unit_converter::format_fixed;
use crate::shared::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl CurrencyInfo {
    pub fn new(code: &str, name: &str, symbol: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Selectable currencies in display order, unique by code.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    currencies: Vec<CurrencyInfo>,
    index: HashMap<String, usize>,
}

impl CurrencyTable {
    pub fn new(currencies: Vec<CurrencyInfo>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(currencies.len());
        for (i, currency) in currencies.iter().enumerate() {
            if index.insert(normalize_code(&currency.code), i).is_some() {
                return Err(AppError::DuplicateSymbol(format!(
                    "currency '{}' listed twice",
                    currency.code
                )));
            }
        }
        Ok(Self { currencies, index })
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyInfo> {
        self.index.get(&normalize_code(code)).map(|&i| &self.currencies[i])
    }

    pub fn currencies(&self) -> &[CurrencyInfo] {
        &self.currencies
    }

    /// Symbol for display, falling back to the code itself
    pub fn symbol_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|c| c.symbol.as_str()).unwrap_or(code)
    }
}

pub static COMMON_CURRENCIES: Lazy<CurrencyTable> = Lazy::new(|| {
    let rows = [
        ("USD", "US Dollar", "$"),
        ("EUR", "Euro", "€"),
        ("GBP", "British Pound", "£"),
        ("JPY", "Japanese Yen", "¥"),
        ("AUD", "Australian Dollar", "A$"),
        ("CAD", "Canadian Dollar", "C$"),
        ("CHF", "Swiss Franc", "CHF"),
        ("CNY", "Chinese Yuan", "CN¥"),
        ("INR", "Indian Rupee", "₹"),
        ("MXN", "Mexican Peso", "MX$"),
        ("BRL", "Brazilian Real", "R$"),
        ("KRW", "South Korean Won", "₩"),
        ("SGD", "Singapore Dollar", "S$"),
        ("HKD", "Hong Kong Dollar", "HK$"),
        ("NZD", "New Zealand Dollar", "NZ$"),
        ("SEK", "Swedish Krona", "kr"),
        ("NOK", "Norwegian Krone", "kr"),
        ("ZAR", "South African Rand", "R"),
        ("TRY", "Turkish Lira", "₺"),
        ("AED", "UAE Dirham", "AED"),
    ];
    CurrencyTable::new(rows.iter().map(|(c, n, s)| CurrencyInfo::new(c, n, s)).collect())
        .expect("built-in currency table must be valid")
});

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Wire format of the rate source: `GET {rates_url}/{BASE}`.
///
/// Rate values may arrive as numbers or numeric strings; codes are uppercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesPayload {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time_last_updated: Option<i64>,
    #[serde(deserialize_with = "deserialize_rates")]
    pub rates: HashMap<String, f64>,
}

impl RatesPayload {
    pub fn new(base: &str, rates: &[(&str, f64)]) -> Self {
        Self {
            base: Some(normalize_code(base)),
            date: None,
            time_last_updated: None,
            rates: rates.iter().map(|(c, r)| (normalize_code(c), *r)).collect(),
        }
    }
}

fn deserialize_rates<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(code, value)| {
            let rate = match value {
                Value::Number(num) => num
                    .as_f64()
                    .ok_or_else(|| serde::de::Error::custom("invalid numeric rate"))?,
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| serde::de::Error::custom(format!("invalid rate string: {}", e)))?,
                _ => return Err(serde::de::Error::custom("unsupported rate type")),
            };
            Ok((code.to_uppercase(), rate))
        })
        .collect()
}

/// "1 base = rate quote", stamped with when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

/// A completed conversion ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyQuote {
    pub amount: f64,
    pub result: f64,
    pub rate: ExchangeRate,
}

impl CurrencyQuote {
    pub fn is_identity(&self) -> bool {
        self.rate.base == self.rate.quote
    }

    pub fn formatted_result(&self, precision: u32) -> String {
        format_fixed(self.result, precision)
    }

    /// "1 USD = 0.9200 EUR"; `None` when both sides are the same currency.
    pub fn rate_line(&self, precision: u32) -> Option<String> {
        if self.is_identity() {
            return None;
        }
        Some(format!(
            "1 {} = {} {}",
            self.rate.base,
            format_fixed(self.rate.rate, precision),
            self.rate.quote
        ))
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.rate.fetched_at
    }

    pub fn last_updated_label(&self) -> String {
        format!("Last updated: {}", self.rate.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// State of the currency page's result area.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CurrencyDisplay {
    #[default]
    Idle,
    Loading { generation: u64 },
    Ready(CurrencyQuote),
    Unavailable { reason: AppError },
}

impl CurrencyDisplay {
    pub fn quote(&self) -> Option<&CurrencyQuote> {
        match self {
            CurrencyDisplay::Ready(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CurrencyDisplay::Loading { .. })
    }

    /// Notice text for the page; only `Unavailable` carries one
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            CurrencyDisplay::Unavailable { reason } if reason.is_user_visible() => Some(reason.user_message()),
            _ => None,
        }
    }
}
