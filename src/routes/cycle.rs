use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{reject, today_or_clock, AppState};
use crate::cycle::{summarize, CycleStatus, CycleStrategy};
use crate::models::{CycleConfig, LogBook};

#[derive(Deserialize)]
pub struct CycleRequest {
    #[serde(default)]
    pub config: CycleConfig,
    #[serde(default)]
    pub logs: LogBook,
    pub today: Option<NaiveDate>,
    pub strategy: Option<CycleStrategy>,
}

#[derive(Deserialize)]
pub struct PeriodStart {
    #[serde(default)]
    pub config: CycleConfig,
    pub start_date: NaiveDate,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle", post(get_cycle_summary))
        .route("/cycle/period-start", post(record_period_start))
        .with_state(state)
}

async fn get_cycle_summary(
    State(state): State<AppState>,
    Json(body): Json<CycleRequest>,
) -> Result<Json<CycleStatus>, (StatusCode, String)> {
    body.config.validate().map_err(reject)?;

    let today = today_or_clock(body.today);
    let strategy = body.strategy.unwrap_or(state.strategy);
    let status = summarize(strategy, &body.config, &body.logs, today).map_err(reject)?;

    if status == CycleStatus::Untracked {
        tracing::debug!(strategy = strategy.as_str(), "Cycle not yet tracked");
    }
    Ok(Json(status))
}

async fn record_period_start(
    Json(body): Json<PeriodStart>,
) -> Result<Json<CycleConfig>, (StatusCode, String)> {
    body.config.validate().map_err(reject)?;

    let mut config = body.config;
    config.record_period_start(body.start_date);
    Ok(Json(config))
}
