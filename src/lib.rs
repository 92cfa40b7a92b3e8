//! ConvertAll core: unit, currency and text conversion engines, the tool
//! catalog, form-field models and a thin client for the conversion backend.

pub mod api;
pub mod config;
pub mod core;
pub mod logging;
pub mod shared;

pub use crate::core::features::{execute_feature_action, AppFeature, FeatureRegistry};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::settings::AppSettings;
