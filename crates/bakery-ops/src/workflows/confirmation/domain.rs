use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a client (PDV) receiving deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub String);

/// Identifier of a scheduled order, used to link reschedule records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Order as handed over by the caller, before validation.
///
/// Fields are read loosely from JSON; `TryFrom<OrderRequest>` validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scheduled_date: Option<String>,
    /// Default delivery periodicity configured on the client, in days.
    #[serde(default, deserialize_with = "lenient_days")]
    pub periodicity_days: Option<u32>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(raw) => Some(raw),
        other => Some(other.to_string()),
    })
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().and_then(|days| u32::try_from(days).ok()),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    })
}

/// Validated order ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOrder {
    pub client_id: ClientId,
    pub order_id: Option<OrderId>,
    pub scheduled_date: NaiveDate,
    pub periodicity_days: Option<u32>,
}

impl ScheduledOrder {
    pub fn key(&self) -> ScoreKey {
        match &self.order_id {
            Some(order_id) => ScoreKey(order_id.0.clone()),
            None => ScoreKey(self.client_id.0.clone()),
        }
    }
}

/// Reasons an order request cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedOrder {
    #[error("order has no client identifier")]
    MissingClient,
    #[error("order has no scheduled date")]
    MissingDate,
    #[error("scheduled date '{0}' is not a valid date")]
    InvalidDate(String),
}

impl TryFrom<OrderRequest> for ScheduledOrder {
    type Error = MalformedOrder;

    fn try_from(request: OrderRequest) -> Result<Self, Self::Error> {
        let client_id = request
            .client_id
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .ok_or(MalformedOrder::MissingClient)?;

        let raw_date = request
            .scheduled_date
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(MalformedOrder::MissingDate)?;
        let scheduled_date =
            parse_date(&raw_date).ok_or_else(|| MalformedOrder::InvalidDate(raw_date.clone()))?;

        let order_id = request
            .order_id
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(OrderId);

        Ok(Self {
            client_id: ClientId(client_id),
            order_id,
            scheduled_date,
            periodicity_days: request.periodicity_days,
        })
    }
}

/// Kind of a historical stock movement. Only deliveries feed the cadence model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Delivery,
    Other(String),
}

impl RecordKind {
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "delivery" | "entrega" => Self::Delivery,
            _ => Self::Other(normalized),
        }
    }
}

/// A fulfilled delivery in the client's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub client_id: ClientId,
    pub date: NaiveDate,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub kind: RecordKind,
}

/// Direction of a reschedule relative to the original date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescheduleKind {
    Postponement,
    Advancement,
}

impl RescheduleKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "postponement" | "adiamento" => Some(Self::Postponement),
            "advancement" | "antecipacao" | "antecipação" => Some(Self::Advancement),
            _ => None,
        }
    }
}

/// A change of delivery date recorded against a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleRecord {
    pub client_id: ClientId,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub original_date: NaiveDate,
    pub new_date: NaiveDate,
    pub kind: RescheduleKind,
    pub created_at: NaiveDateTime,
}

/// Key of the output map: the order id when known, else the client id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreKey(pub String);

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confidence band shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

/// Integer breakdown of the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub baseline: i32,
    pub volatility_penalty: i32,
    pub trend_vector: i32,
}

/// Estimated likelihood that the client confirms a scheduled delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationScore {
    pub score: u8,
    pub tier: ScoreTier,
    pub explanation: String,
    pub factors: ScoreFactors,
}

/// Accepts plain `YYYY-MM-DD` dates as well as RFC 3339 timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

/// Timestamps are normalized to naive UTC.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
