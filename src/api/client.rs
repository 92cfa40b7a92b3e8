use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::features::currency::types::CurrencyInfo;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

// -- Backend payloads --

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertCurrencyBody<'a> {
    from_currency: &'a str,
    to_currency: &'a str,
    amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub converted_amount: f64,
    pub rate: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateHistoryPoint {
    pub date: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// JSON client for the conversion backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, auth_token: Option<&str>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Config("auth token contains invalid header characters".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        Self::new(
            settings.api.base_url.clone(),
            settings.timeout(),
            settings.api.auth_token.as_deref(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "backend request failed");
            AppError::Network(format!("Backend connection failed: {}", e))
        })?;

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log_failure(status, &url, &body);
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse response from {}: {}", url, e)))
    }

    // -- Currency endpoints --

    pub async fn currency_rates(&self, base: &str) -> AppResult<Vec<CurrencyRate>> {
        self.get_json(&format!("/currency/rates?base={}", urlencoding::encode(base)))
            .await
    }

    pub async fn convert_currency(&self, from: &str, to: &str, amount: f64) -> AppResult<CurrencyConversion> {
        let body = ConvertCurrencyBody {
            from_currency: from,
            to_currency: to,
            amount,
        };
        self.post_json("/currency/convert", &body).await
    }

    pub async fn supported_currencies(&self) -> AppResult<Vec<CurrencyInfo>> {
        self.get_json("/currency/supported").await
    }

    pub async fn currency_history(&self, from: &str, to: &str, days: u32) -> AppResult<Vec<RateHistoryPoint>> {
        let path = format!(
            "/currency/history?from={}&to={}&days={}",
            urlencoding::encode(from),
            urlencoding::encode(to),
            days
        );
        self.get_json(&path).await
    }

    /// `Ok` when the backend answers `/health` with a success status.
    pub async fn health(&self) -> AppResult<()> {
        let _: serde_json::Value = self.get_json("/health").await?;
        Ok(())
    }
}

fn log_failure(status: StatusCode, url: &str, body: &str) {
    match status {
        StatusCode::UNAUTHORIZED => tracing::warn!(%url, "unauthorized access"),
        StatusCode::FORBIDDEN => tracing::warn!(%url, "access forbidden"),
        StatusCode::NOT_FOUND => tracing::warn!(%url, "resource not found"),
        StatusCode::INTERNAL_SERVER_ERROR => tracing::error!(%url, "server error"),
        _ => tracing::warn!(%status, %url, %body, "backend returned an error"),
    }
}
