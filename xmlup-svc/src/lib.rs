//! xmlup-svc library - upload service for issue metadata correction
//!
//! Accepts an XML upload plus volume, issue, year and date, and returns the
//! corrected document as a download.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use xmlup_common::config::TomlConfig;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "xmlup-svc";

/// Application state shared across HTTP handlers
///
/// Read-only after startup: submissions never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Largest accepted upload request, in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self {
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    pub fn from_config(config: &TomlConfig) -> Self {
        Self::new(config.max_upload_bytes)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::correct_routes())
        .merge(api::buildinfo_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
