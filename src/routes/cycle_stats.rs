use axum::{response::Json, routing::post, Router};
use serde::Deserialize;

use crate::history::{cycle_stats, period_history, CycleStats};
use crate::models::LogBook;

#[derive(Deserialize)]
pub struct CycleStatsRequest {
    #[serde(default)]
    logs: LogBook,
}

pub async fn get_cycle_stats(Json(body): Json<CycleStatsRequest>) -> Json<CycleStats> {
    let episodes = period_history(&body.logs);
    Json(cycle_stats(&episodes))
}

pub fn routes() -> Router {
    Router::new().route("/cycle-stats", post(get_cycle_stats))
}
