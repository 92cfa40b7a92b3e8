//! Feature registry with enum dispatch
//!
//! Each tool family implements `FeatureSync` (metadata, dispatched statically
//! through `AppFeature`) and `FeatureAsync` (action execution).

use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::ERR_UNSUPPORTED_ACTION;
use crate::shared::settings::AppSettings;
use crate::shared::types::{ActionType, ExecuteActionRequest, ExecuteActionResponse, QuickAction};
use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use std::sync::{Arc, OnceLock};

pub mod currency;
pub mod text_analyser;
pub mod text_case;
pub mod unit_converter;

/// Sync methods trait for enum_dispatch
///
/// enum_dispatch works with sync methods only.
/// Async methods are handled separately via async_trait.
#[enum_dispatch]
pub trait FeatureSync: Send + Sync {
    /// Unique identifier for this feature
    fn id(&self) -> &str;

    /// Catalog entries whose pages this feature powers
    fn tool_ids(&self) -> Vec<&'static str>;

    /// Actions that run directly on a piece of text, without opening a page
    fn quick_actions(&self) -> Vec<QuickAction>;
}

#[async_trait]
pub trait FeatureAsync: Send + Sync {
    /// Execute an action for this feature
    ///
    /// Features return `ERR_UNSUPPORTED_ACTION` for actions they do not own.
    async fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse>;
}

#[enum_dispatch(FeatureSync)]
pub enum AppFeature {
    UnitConverter(unit_converter::UnitConverterFeature),
    Currency(currency::CurrencyFeature),
    TextCase(text_case::TextCaseFeature),
    TextAnalyser(text_analyser::TextAnalyserFeature),
}

impl AppFeature {
    pub fn all(settings: &AppSettings) -> AppResult<Vec<Self>> {
        let rates = currency::service::HttpRateSource::from_settings(settings)?;
        Ok(vec![
            AppFeature::UnitConverter(unit_converter::UnitConverterFeature),
            AppFeature::Currency(currency::CurrencyFeature::new(Arc::new(rates), settings.timeout())),
            AppFeature::TextCase(text_case::TextCaseFeature),
            AppFeature::TextAnalyser(text_analyser::TextAnalyserFeature),
        ])
    }

    async fn execute(&self, request: &ExecuteActionRequest) -> AppResult<ExecuteActionResponse> {
        // enum_dispatch does not cover async methods
        match self {
            AppFeature::UnitConverter(f) => f.execute_action(&request.action_type, &request.params).await,
            AppFeature::Currency(f) => f.execute_action(&request.action_type, &request.params).await,
            AppFeature::TextCase(f) => f.execute_action(&request.action_type, &request.params).await,
            AppFeature::TextAnalyser(f) => f.execute_action(&request.action_type, &request.params).await,
        }
    }
}

fn is_unsupported(err: &AppError) -> bool {
    matches!(err, AppError::Validation(msg) if msg == ERR_UNSUPPORTED_ACTION)
}

pub struct FeatureRegistry {
    features: Vec<AppFeature>,
    quick_actions: OnceLock<Vec<QuickAction>>,
}

impl FeatureRegistry {
    pub fn new(features: Vec<AppFeature>) -> Self {
        Self {
            features,
            quick_actions: OnceLock::new(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        Ok(Self::new(AppFeature::all(settings)?))
    }

    pub fn features(&self) -> &[AppFeature] {
        &self.features
    }

    /// Quick actions of every feature, built once
    pub fn quick_actions(&self) -> &[QuickAction] {
        self.quick_actions.get_or_init(|| {
            let items: Vec<QuickAction> = self.features.iter().flat_map(|f| f.quick_actions()).collect();
            tracing::debug!(count = items.len(), features = self.features.len(), "quick action index built");
            items
        })
    }

    /// Features backing a catalog page
    pub fn features_for_tool(&self, tool_id: &str) -> Vec<&AppFeature> {
        self.features
            .iter()
            .filter(|f| f.tool_ids().iter().any(|id| *id == tool_id))
            .collect()
    }

    /// Run an action on the first feature that claims it.
    ///
    /// A feature that recognises the action but fails ends the search with its error.
    pub async fn execute(&self, request: &ExecuteActionRequest) -> AppResult<ExecuteActionResponse> {
        for feature in &self.features {
            match feature.execute(request).await {
                Ok(response) => return Ok(response),
                Err(e) if is_unsupported(&e) => continue,
                Err(e) => {
                    tracing::warn!(feature = feature.id(), error = %e, "action failed");
                    return Err(e);
                }
            }
        }

        Err(AppError::Validation(format!("No feature handles {:?}", request.action_type)))
    }
}

pub async fn execute_feature_action(
    registry: &FeatureRegistry,
    request: &ExecuteActionRequest,
) -> AppResult<ExecuteActionResponse> {
    registry.execute(request).await
}
