pub mod backend;
pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod roster;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use backend::{BackendClient, BackendError};
use roster::DaySuffixTable;
#[cfg(feature = "reports")]
use services::reports::ReportService;
use services::{
    expenses::ExpenseService, payment::PaymentService, roster::RosterService, session::SessionService,
};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub roster: RosterService,
    pub payments: PaymentService,
    pub expenses: ExpenseService,
    #[cfg(feature = "reports")]
    pub reports: ReportService,
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, BackendError> {
        let backend = BackendClient::from_config(&config.backend)?;
        let suffixes = DaySuffixTable::from(config.display.day_suffix_style);

        Ok(Arc::new(Self {
            roster: RosterService::new(backend.clone(), suffixes),
            payments: PaymentService::new(backend.clone()),
            expenses: ExpenseService::new(backend.clone()),
            #[cfg(feature = "reports")]
            reports: ReportService::new(backend),
            sessions: SessionService::from_config(&config.session),
            config,
        }))
    }
}

/// Полный HTTP-роутер приложения.
pub fn build_router(state: Arc<AppState>) -> Router {
    let enable_cors = state.config.features.enable_cors;

    let router = Router::new()
        .route("/", get(|| async { "SwayamShiksha seat desk v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
