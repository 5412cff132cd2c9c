//! Delivery confirmation scoring for scheduled orders.
//!
//! The engine is a pure function of the orders and the history handed to it.
//! Fetching history and rendering scores belong to the callers; see
//! [`HistoryWindow`] for the trailing windows the caller is expected to apply.

pub mod domain;
pub mod history;
pub mod report;
pub mod router;
mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    ClientId, ConfirmationScore, DeliveryRecord, MalformedOrder, OrderId, OrderRequest,
    RecordKind, RescheduleKind, RescheduleRecord, ScheduledOrder, ScoreFactors, ScoreKey,
    ScoreTier,
};
pub use history::{HistoryImportError, HistoryImporter, HistoryWindow};
pub use report::{ScoreBatch, SkippedOrder, TierSummary};
pub use router::{confirmation_router, ScoreEntry, ScoreRequest, ScoreResponse};
pub use scoring::{tier_for, ScoringConfig};

use std::collections::HashMap;
use tracing::{info, warn};

/// Stateless scorer carrying the numeric policy.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationScoreEngine {
    config: ScoringConfig,
}

impl ConfirmationScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores every well-formed order. Malformed orders are reported in
    /// [`ScoreBatch::skipped`] and never abort the batch.
    pub fn score_batch(
        &self,
        orders: &[OrderRequest],
        deliveries: &[DeliveryRecord],
        reschedules: &[RescheduleRecord],
    ) -> ScoreBatch {
        let deliveries_by_client = group_deliveries(deliveries);
        let reschedules_by_client = group_reschedules(reschedules);

        let mut batch = ScoreBatch::default();
        for (index, request) in orders.iter().enumerate() {
            let order = match ScheduledOrder::try_from(request.clone()) {
                Ok(order) => order,
                Err(reason) => {
                    warn!(
                        index,
                        client = ?request.client_id,
                        order = ?request.order_id,
                        %reason,
                        "skipping malformed order"
                    );
                    batch.skipped.push(SkippedOrder {
                        index,
                        order_id: request.order_id.clone(),
                        client_id: request.client_id.clone(),
                        reason: reason.to_string(),
                    });
                    continue;
                }
            };

            let client_deliveries = deliveries_by_client
                .get(&order.client_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let client_reschedules = reschedules_by_client
                .get(&order.client_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            match scoring::score_order(&order, client_deliveries, client_reschedules, &self.config)
            {
                Ok(score) => {
                    batch.scores.insert(order.key(), score);
                }
                Err(reason) => {
                    warn!(
                        index,
                        client = %order.client_id.0,
                        key = %order.key(),
                        %reason,
                        "skipping order with out-of-range cadence"
                    );
                    batch.skipped.push(SkippedOrder {
                        index,
                        order_id: request.order_id.clone(),
                        client_id: request.client_id.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
        }

        info!(
            scored = batch.scores.len(),
            skipped = batch.skipped.len(),
            "confirmation scores computed"
        );

        batch
    }
}

/// Maps each well-formed order to its confirmation score.
pub fn compute_scores(
    orders: &[OrderRequest],
    deliveries: &[DeliveryRecord],
    reschedules: &[RescheduleRecord],
    config: &ScoringConfig,
) -> HashMap<ScoreKey, ConfirmationScore> {
    ConfirmationScoreEngine::new(config.clone())
        .score_batch(orders, deliveries, reschedules)
        .scores
}

fn group_deliveries(deliveries: &[DeliveryRecord]) -> HashMap<&ClientId, Vec<&DeliveryRecord>> {
    let mut grouped: HashMap<&ClientId, Vec<&DeliveryRecord>> = HashMap::new();
    for record in deliveries
        .iter()
        .filter(|record| record.kind == RecordKind::Delivery)
    {
        grouped.entry(&record.client_id).or_default().push(record);
    }
    for records in grouped.values_mut() {
        records.sort_by_key(|record| record.date);
    }
    grouped
}

fn group_reschedules(
    reschedules: &[RescheduleRecord],
) -> HashMap<&ClientId, Vec<&RescheduleRecord>> {
    let mut grouped: HashMap<&ClientId, Vec<&RescheduleRecord>> = HashMap::new();
    for record in reschedules {
        grouped.entry(&record.client_id).or_default().push(record);
    }
    grouped
}
