//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::config::Config;
use crate::services::AnalyticsService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub analytics: Arc<AnalyticsService>,
    pub config: Arc<Config>,
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        analytics: Arc<AnalyticsService>,
        config: Arc<Config>,
        db: SqlitePool,
    ) -> Self {
        Self {
            auth_service,
            analytics,
            config,
            db,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AnalyticsService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.analytics.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
