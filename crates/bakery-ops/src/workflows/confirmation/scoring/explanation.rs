use super::cadence::CadenceBaseline;
use super::config::ScoringConfig;
use super::trend::TrendSignals;

pub(crate) fn no_history() -> String {
    "new client, no delivery history".to_string()
}

pub(crate) fn single_delivery(periodicity_days: u32) -> String {
    format!("single delivery on record, assuming default periodicity of {periodicity_days} days")
}

pub(crate) fn assemble(
    cadence: &CadenceBaseline,
    linked_count: usize,
    trend: &TrendSignals,
    config: &ScoringConfig,
) -> String {
    let mut parts = vec![format!(
        "orders every ~{} days",
        cadence.mean_interval.round() as i64
    )];

    if cadence.deviation > 0 {
        parts.push(format!(
            "{} day(s) later than expected cadence",
            cadence.deviation
        ));
    } else if cadence.deviation < -config.early_tolerance_days {
        parts.push(format!(
            "{} day(s) earlier than expected cadence",
            cadence.deviation.abs()
        ));
    } else {
        parts.push("on cadence".to_string());
    }

    if linked_count > 0 {
        parts.push(format!("rescheduled {linked_count}x"));
    }
    if trend.repeatedly_postponed {
        parts.push(format!(
            "postponed repeatedly ({}x)",
            trend.linked_postponements
        ));
    }
    if trend.advancing_client {
        parts.push("tends to advance deliveries".to_string());
    }

    parts.join("; ")
}
