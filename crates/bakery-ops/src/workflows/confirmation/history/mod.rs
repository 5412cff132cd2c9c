mod parser;

pub use parser::HistoryImportError;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{ClientId, DeliveryRecord, OrderRequest, RecordKind, RescheduleRecord};

/// Trailing windows applied to history before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    pub delivery_lookback_days: i64,
    pub reschedule_lookback_days: i64,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            delivery_lookback_days: 84,
            reschedule_lookback_days: 90,
        }
    }
}

impl HistoryWindow {
    /// Deliveries for the ordered clients within the lookback, ascending by date.
    pub fn select_deliveries(
        &self,
        records: &[DeliveryRecord],
        orders: &[OrderRequest],
        today: NaiveDate,
    ) -> Vec<DeliveryRecord> {
        let clients = order_clients(orders);
        let since = window_start(today, self.delivery_lookback_days);

        let mut selected: Vec<DeliveryRecord> = records
            .iter()
            .filter(|record| record.kind == RecordKind::Delivery)
            .filter(|record| clients.contains(&record.client_id))
            .filter(|record| since.map_or(true, |since| record.date >= since))
            .cloned()
            .collect();
        selected.sort_by_key(|record| record.date);
        selected
    }

    /// Reschedules for the ordered clients created within the lookback.
    pub fn select_reschedules(
        &self,
        records: &[RescheduleRecord],
        orders: &[OrderRequest],
        today: NaiveDate,
    ) -> Vec<RescheduleRecord> {
        let clients = order_clients(orders);
        let since = window_start(today, self.reschedule_lookback_days)
            .and_then(|date| date.and_hms_opt(0, 0, 0));

        records
            .iter()
            .filter(|record| clients.contains(&record.client_id))
            .filter(|record| since.map_or(true, |since| record.created_at >= since))
            .cloned()
            .collect()
    }
}

/// First day inside a trailing window; `None` when the window reaches past
/// the start of the calendar and so bounds nothing.
fn window_start(today: NaiveDate, lookback_days: i64) -> Option<NaiveDate> {
    Duration::try_days(lookback_days).and_then(|lookback| today.checked_sub_signed(lookback))
}

fn order_clients(orders: &[OrderRequest]) -> HashSet<ClientId> {
    orders
        .iter()
        .filter_map(|order| order.client_id.as_deref())
        .map(str::trim)
        .filter(|client| !client.is_empty())
        .map(|client| ClientId(client.to_string()))
        .collect()
}

/// Reads CSV exports of orders and history from the managed store.
pub struct HistoryImporter;

impl HistoryImporter {
    pub fn orders_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<OrderRequest>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::orders_from_reader(file)
    }

    pub fn orders_from_reader<R: Read>(reader: R) -> Result<Vec<OrderRequest>, HistoryImportError> {
        parser::parse_orders(reader)
    }

    pub fn deliveries_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<DeliveryRecord>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::deliveries_from_reader(file)
    }

    pub fn deliveries_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<DeliveryRecord>, HistoryImportError> {
        parser::parse_deliveries(reader)
    }

    pub fn reschedules_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<RescheduleRecord>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::reschedules_from_reader(file)
    }

    pub fn reschedules_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<RescheduleRecord>, HistoryImportError> {
        parser::parse_reschedules(reader)
    }
}
