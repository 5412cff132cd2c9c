use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ConfirmationScore, DeliveryRecord, OrderRequest, RescheduleRecord, ScoreKey};
use super::history::HistoryWindow;
use super::report::{SkippedOrder, TierSummary};
use super::ConfirmationScoreEngine;
use crate::error::AppError;

#[derive(Clone)]
struct ScoringState {
    engine: Arc<ConfirmationScoreEngine>,
    window: HistoryWindow,
}

/// Router exposing batch scoring over HTTP.
pub fn confirmation_router(engine: Arc<ConfirmationScoreEngine>, window: HistoryWindow) -> Router {
    Router::new()
        .route("/api/v1/confirmation/scores", post(score_handler))
        .with_state(ScoringState { engine, window })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Anchor of the history windows; defaults to the local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    pub orders: Vec<OrderRequest>,
    #[serde(default)]
    pub deliveries: Vec<DeliveryRecord>,
    #[serde(default)]
    pub reschedules: Vec<RescheduleRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreEntry {
    pub key: ScoreKey,
    #[serde(flatten)]
    pub score: ConfirmationScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub today: NaiveDate,
    pub scores: Vec<ScoreEntry>,
    pub skipped: Vec<SkippedOrder>,
    pub summary: TierSummary,
}

async fn score_handler(
    State(state): State<ScoringState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "rejected score request");
        AppError::from(rejection)
    })?;
    Ok(Json(score_request(&state.engine, &state.window, request)))
}

/// Applies the history windows, then scores the batch.
pub(crate) fn score_request(
    engine: &ConfirmationScoreEngine,
    window: &HistoryWindow,
    request: ScoreRequest,
) -> ScoreResponse {
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    let deliveries = window.select_deliveries(&request.deliveries, &request.orders, today);
    let reschedules = window.select_reschedules(&request.reschedules, &request.orders, today);

    let batch = engine.score_batch(&request.orders, &deliveries, &reschedules);
    let summary = batch.summary();
    let scores = batch
        .sorted()
        .into_iter()
        .map(|(key, score)| ScoreEntry {
            key: key.clone(),
            score: score.clone(),
        })
        .collect();

    ScoreResponse {
        today,
        scores,
        skipped: batch.skipped,
        summary,
    }
}
