use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{today_or_clock, AppState};
use crate::insights::Insight;
use crate::models::LogBook;

#[derive(Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub logs: LogBook,
    pub today: Option<NaiveDate>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/insights", post(get_insights))
        .with_state(state)
}

async fn get_insights(
    State(state): State<AppState>,
    Json(body): Json<InsightsRequest>,
) -> Json<Vec<Insight>> {
    let today = today_or_clock(body.today);
    Json(state.engine.analyze(&body.logs, today))
}
