use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::workflows::confirmation::domain::{
    ClientId, DeliveryRecord, OrderId, OrderRequest, RecordKind, RescheduleKind, RescheduleRecord,
};
use crate::workflows::confirmation::{ConfirmationScoreEngine, ScoringConfig};

pub(super) const CLIENT: &str = "pdv-padaria-central";

pub(super) fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid anchor date") + Duration::days(offset)
}

pub(super) fn hours_before(offset: i64, hours: i64) -> NaiveDateTime {
    day(offset).and_hms_opt(0, 0, 0).expect("valid midnight") - Duration::hours(hours)
}

pub(super) fn engine() -> ConfirmationScoreEngine {
    ConfirmationScoreEngine::new(ScoringConfig::default())
}

pub(super) fn order(order_id: Option<&str>, offset: i64) -> OrderRequest {
    OrderRequest {
        client_id: Some(CLIENT.to_string()),
        order_id: order_id.map(str::to_string),
        scheduled_date: Some(day(offset).format("%Y-%m-%d").to_string()),
        periodicity_days: None,
    }
}

pub(super) fn deliveries(offsets: &[i64]) -> Vec<DeliveryRecord> {
    deliveries_for(CLIENT, offsets)
}

pub(super) fn deliveries_for(client: &str, offsets: &[i64]) -> Vec<DeliveryRecord> {
    offsets
        .iter()
        .map(|offset| DeliveryRecord {
            client_id: ClientId(client.to_string()),
            date: day(*offset),
            quantity: 48.0,
            kind: RecordKind::Delivery,
        })
        .collect()
}

pub(super) fn reschedule(
    order_id: Option<&str>,
    original_offset: i64,
    kind: RescheduleKind,
    created_at: NaiveDateTime,
) -> RescheduleRecord {
    let shift = match kind {
        RescheduleKind::Postponement => 2,
        RescheduleKind::Advancement => -2,
    };
    RescheduleRecord {
        client_id: ClientId(CLIENT.to_string()),
        order_id: order_id.map(|id| OrderId(id.to_string())),
        original_date: day(original_offset),
        new_date: day(original_offset + shift),
        kind,
        created_at,
    }
}
