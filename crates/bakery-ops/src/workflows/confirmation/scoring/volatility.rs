use chrono::Duration;

use super::super::domain::{RescheduleRecord, ScheduledOrder};
use super::config::ScoringConfig;

/// How the reschedules affecting an order were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Linkage {
    OrderId,
    Proximity,
}

pub(crate) struct LinkedReschedules<'a> {
    pub records: Vec<&'a RescheduleRecord>,
    pub linkage: Linkage,
}

/// Explicit order links win; otherwise fall back to reschedules whose original
/// date sits within the proximity window of the scheduled date.
pub(crate) fn link_reschedules<'a>(
    order: &ScheduledOrder,
    client_reschedules: &[&'a RescheduleRecord],
    config: &ScoringConfig,
) -> LinkedReschedules<'a> {
    if let Some(order_id) = &order.order_id {
        let by_id: Vec<&RescheduleRecord> = client_reschedules
            .iter()
            .copied()
            .filter(|record| record.order_id.as_ref() == Some(order_id))
            .collect();
        if !by_id.is_empty() {
            return LinkedReschedules {
                records: by_id,
                linkage: Linkage::OrderId,
            };
        }
    }

    let records = client_reschedules
        .iter()
        .copied()
        .filter(|record| {
            (record.original_date - order.scheduled_date).num_days().abs()
                <= config.proximity_window_days
        })
        .collect();

    LinkedReschedules {
        records,
        linkage: Linkage::Proximity,
    }
}

/// Created less than the urgent window before the original date (or after it).
pub(crate) fn is_urgent(record: &RescheduleRecord, config: &ScoringConfig) -> bool {
    let Some(original_start) = record.original_date.and_hms_opt(0, 0, 0) else {
        return false;
    };
    let lead = original_start - record.created_at;
    Duration::try_hours(config.urgent_reschedule_hours).map_or(true, |window| lead < window)
}

pub(crate) fn penalty(linked: &[&RescheduleRecord], config: &ScoringConfig) -> i32 {
    linked
        .iter()
        .map(|record| {
            let urgent = if is_urgent(record, config) {
                config.urgent_reschedule_penalty
            } else {
                0
            };
            -(config.reschedule_penalty + urgent)
        })
        .sum()
}
