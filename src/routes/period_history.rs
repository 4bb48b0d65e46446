use axum::{routing::post, Json, Router};
use serde::Deserialize;

use crate::history::{period_history, BleedingEpisode};
use crate::models::LogBook;

#[derive(Deserialize)]
pub struct PeriodHistoryRequest {
    #[serde(default)]
    pub logs: LogBook,
}

pub fn routes() -> Router {
    Router::new().route("/period-history", post(get_period_history))
}

pub async fn get_period_history(
    Json(body): Json<PeriodHistoryRequest>,
) -> Json<Vec<BleedingEpisode>> {
    Json(period_history(&body.logs))
}
