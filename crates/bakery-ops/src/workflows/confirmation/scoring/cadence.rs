use chrono::{Duration, NaiveDate};

use super::config::ScoringConfig;

/// Outcome of matching the scheduled date against the client's delivery rhythm.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CadenceBaseline {
    pub mean_interval: f64,
    pub expected_date: NaiveDate,
    /// Scheduled minus expected, in days. Positive means the client is overdue.
    pub deviation: i64,
    pub penalty: f64,
    pub weight: f64,
    pub baseline: f64,
}

/// Projected next delivery falls outside the representable calendar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected delivery {interval_days} days after {last} is out of range")]
pub(crate) struct ExpectedDateOutOfRange {
    pub last: NaiveDate,
    pub interval_days: i64,
}

/// Requires at least two delivery dates sorted ascending; returns `Ok(None)`
/// when there are fewer.
pub(crate) fn baseline(
    delivery_dates: &[NaiveDate],
    scheduled: NaiveDate,
    config: &ScoringConfig,
) -> Result<Option<CadenceBaseline>, ExpectedDateOutOfRange> {
    let Some(&last) = delivery_dates.last() else {
        return Ok(None);
    };
    if delivery_dates.len() < 2 {
        return Ok(None);
    }

    let gaps: Vec<i64> = delivery_dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();
    let mean_interval = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

    let interval_days = mean_interval.round() as i64;
    let expected_date = Duration::try_days(interval_days)
        .and_then(|interval| last.checked_add_signed(interval))
        .ok_or(ExpectedDateOutOfRange {
            last,
            interval_days,
        })?;
    let deviation = (scheduled - expected_date).num_days();

    let weight = if delivery_dates.len() == 2 {
        config.sparse_history_weight
    } else {
        1.0
    };

    let penalty = deviation_penalty(deviation, config);

    Ok(Some(CadenceBaseline {
        mean_interval,
        expected_date,
        deviation,
        penalty,
        weight,
        baseline: config.base_score - penalty * weight,
    }))
}

pub(crate) fn deviation_penalty(deviation: i64, config: &ScoringConfig) -> f64 {
    if deviation > 0 {
        deviation as f64 * config.late_penalty_per_day
    } else if deviation < -config.early_tolerance_days {
        (deviation.abs() - config.early_tolerance_days) as f64 * config.early_penalty_per_day
    } else {
        0.0
    }
}
