use axum::{http::StatusCode, routing::get, Router};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::cycle::CycleStrategy;
use crate::error::Error;
use crate::insights::InsightEngine;

pub mod cycle;
pub mod cycle_stats;
pub mod dashboard;
pub mod insights;
pub mod period_history;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InsightEngine>,
    pub strategy: CycleStrategy,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            engine: Arc::new(InsightEngine::from_settings(config.rules.clone())),
            strategy: config.strategy,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(cycle::routes(state.clone()))
        .merge(insights::routes(state.clone()))
        .merge(dashboard::routes(state))
        .merge(period_history::routes())
        .merge(cycle_stats::routes())
        .route("/health", get(|| async { "✅ Backend up" }))
}

fn today_or_clock(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Utc::now().naive_utc().date())
}

fn reject(e: Error) -> (StatusCode, String) {
    tracing::warn!("⚠️ Rejected request: {}", e);
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}
