use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{reject, today_or_clock, AppState};
use crate::cycle::{summarize, CycleStatus};
use crate::insights::Insight;
use crate::models::{CycleConfig, LogBook};

#[derive(Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub config: CycleConfig,
    #[serde(default)]
    pub logs: LogBook,
    pub today: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct Dashboard {
    pub cycle: CycleStatus,
    pub insights: Vec<Insight>,
    pub total_entries: usize,
    pub logged_today: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", post(get_dashboard))
        .with_state(state)
}

async fn get_dashboard(
    State(state): State<AppState>,
    Json(body): Json<DashboardRequest>,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    body.config.validate().map_err(reject)?;

    let today = today_or_clock(body.today);
    let cycle = summarize(state.strategy, &body.config, &body.logs, today).map_err(reject)?;
    Ok(Json(Dashboard {
        cycle,
        insights: state.engine.analyze(&body.logs, today),
        total_entries: body.logs.len(),
        logged_today: body.logs.logged_on(today),
    }))
}
