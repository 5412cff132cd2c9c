mod cadence;
mod config;
mod explanation;
mod trend;
mod volatility;

pub(crate) use cadence::ExpectedDateOutOfRange;
pub use config::ScoringConfig;

use super::domain::{
    ConfirmationScore, DeliveryRecord, RescheduleRecord, ScheduledOrder, ScoreFactors, ScoreTier,
};
use chrono::NaiveDate;
use tracing::debug;

/// Runs the full pipeline for one order against that client's history.
///
/// `client_deliveries` must already be restricted to the order's client and
/// sorted ascending by date. Non-delivery records are ignored.
pub(crate) fn score_order(
    order: &ScheduledOrder,
    client_deliveries: &[&DeliveryRecord],
    client_reschedules: &[&RescheduleRecord],
    config: &ScoringConfig,
) -> Result<ConfirmationScore, ExpectedDateOutOfRange> {
    let dates: Vec<NaiveDate> = client_deliveries.iter().map(|record| record.date).collect();

    let Some(cadence) = cadence::baseline(&dates, order.scheduled_date, config)? else {
        return Ok(cold_start(order, dates.len(), config));
    };

    let linked = volatility::link_reschedules(order, client_reschedules, config);
    let volatility_penalty = volatility::penalty(&linked.records, config);
    let (trend_vector, signals) = trend::trend_vector(client_reschedules, &linked.records, config);

    let raw = cadence.baseline + f64::from(volatility_penalty) + f64::from(trend_vector);
    let score = clamp_score(raw, config);

    debug!(
        client = %order.client_id.0,
        mean_interval = cadence.mean_interval,
        expected = %cadence.expected_date,
        deviation = cadence.deviation,
        penalty = cadence.penalty,
        weight = cadence.weight,
        linked = linked.records.len(),
        linkage = ?linked.linkage,
        advancements = signals.advancements,
        postponements = signals.postponements,
        score,
        "scored order"
    );

    Ok(ConfirmationScore {
        score,
        tier: tier_for(score, config),
        explanation: explanation::assemble(&cadence, linked.records.len(), &signals, config),
        factors: ScoreFactors {
            baseline: cadence.baseline.round() as i32,
            volatility_penalty,
            trend_vector,
        },
    })
}

fn cold_start(order: &ScheduledOrder, deliveries: usize, config: &ScoringConfig) -> ConfirmationScore {
    let (score, explanation) = if deliveries == 0 {
        (config.no_history_score, explanation::no_history())
    } else {
        let periodicity = order
            .periodicity_days
            .unwrap_or(config.fallback_periodicity_days);
        (
            config.single_history_score,
            explanation::single_delivery(periodicity),
        )
    };

    ConfirmationScore {
        score,
        tier: tier_for(score, config),
        explanation,
        factors: ScoreFactors {
            baseline: i32::from(score),
            volatility_penalty: 0,
            trend_vector: 0,
        },
    }
}

pub(crate) fn clamp_score(raw: f64, config: &ScoringConfig) -> u8 {
    let clamped = raw.clamp(f64::from(config.min_score), f64::from(config.max_score));
    clamped.round() as u8
}

pub fn tier_for(score: u8, config: &ScoringConfig) -> ScoreTier {
    if score > config.high_tier_above {
        ScoreTier::High
    } else if score >= config.medium_tier_from {
        ScoreTier::Medium
    } else {
        ScoreTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let config = ScoringConfig::default();
        assert_eq!(tier_for(86, &config), ScoreTier::High);
        assert_eq!(tier_for(85, &config), ScoreTier::Medium);
        assert_eq!(tier_for(50, &config), ScoreTier::Medium);
        assert_eq!(tier_for(49, &config), ScoreTier::Low);
    }

    #[test]
    fn clamping_bounds_extreme_values() {
        let config = ScoringConfig::default();
        assert_eq!(clamp_score(-240.0, &config), 5);
        assert_eq!(clamp_score(140.0, &config), 99);
        assert_eq!(clamp_score(84.5, &config), 85);
    }
}
