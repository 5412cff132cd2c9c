use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::super::domain::{
    parse_date, parse_datetime, ClientId, DeliveryRecord, OrderId, OrderRequest, RecordKind,
    RescheduleKind, RescheduleRecord,
};

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, detail: String },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read history export: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid history CSV data: {}", err),
            HistoryImportError::InvalidRow { line, detail } => {
                write!(f, "invalid history row at line {}: {}", line, detail)
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

// Header is line 1.
fn line_of(index: usize) -> usize {
    index + 2
}

pub(crate) fn parse_orders<R: Read>(input: R) -> Result<Vec<OrderRequest>, HistoryImportError> {
    let mut csv_reader = reader(input);
    let mut orders = Vec::new();

    for row in csv_reader.deserialize::<OrderRow>() {
        let row = row?;
        orders.push(OrderRequest {
            client_id: row.client_id,
            order_id: row.order_id,
            scheduled_date: row.scheduled_date,
            periodicity_days: row.periodicity_days,
        });
    }

    Ok(orders)
}

pub(crate) fn parse_deliveries<R: Read>(
    input: R,
) -> Result<Vec<DeliveryRecord>, HistoryImportError> {
    let mut csv_reader = reader(input);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<DeliveryRow>().enumerate() {
        let row = row?;
        let date = parse_date(&row.date).ok_or_else(|| HistoryImportError::InvalidRow {
            line: line_of(index),
            detail: format!("unparseable delivery date '{}'", row.date),
        })?;

        records.push(DeliveryRecord {
            client_id: ClientId(row.client_id),
            date,
            quantity: row.quantity.unwrap_or(0.0),
            kind: row
                .kind
                .as_deref()
                .map(RecordKind::from_label)
                .unwrap_or(RecordKind::Delivery),
        });
    }

    Ok(records)
}

pub(crate) fn parse_reschedules<R: Read>(
    input: R,
) -> Result<Vec<RescheduleRecord>, HistoryImportError> {
    let mut csv_reader = reader(input);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RescheduleRow>().enumerate() {
        let row = row?;
        let line = line_of(index);
        let invalid = |detail: String| HistoryImportError::InvalidRow { line, detail };

        let original_date = parse_date(&row.original_date)
            .ok_or_else(|| invalid(format!("unparseable original date '{}'", row.original_date)))?;
        let new_date = parse_date(&row.new_date)
            .ok_or_else(|| invalid(format!("unparseable new date '{}'", row.new_date)))?;
        let kind = RescheduleKind::from_label(&row.kind)
            .ok_or_else(|| invalid(format!("unknown reschedule type '{}'", row.kind)))?;
        let created_at = parse_datetime(&row.created_at)
            .ok_or_else(|| invalid(format!("unparseable created_at '{}'", row.created_at)))?;

        records.push(RescheduleRecord {
            client_id: ClientId(row.client_id),
            order_id: row.order_id.map(OrderId),
            original_date,
            new_date,
            kind,
            created_at,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    client_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    order_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    scheduled_date: Option<String>,
    #[serde(default, deserialize_with = "empty_number_as_none")]
    periodicity_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DeliveryRow {
    client_id: String,
    date: String,
    #[serde(default, deserialize_with = "empty_number_as_none")]
    quantity: Option<f64>,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RescheduleRow {
    client_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    order_id: Option<String>,
    original_date: String,
    new_date: String,
    #[serde(rename = "type")]
    kind: String,
    created_at: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_number_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match empty_string_as_none(deserializer)? {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
