//! Tracking record model and its API views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use waypost_core::{OrderId, RecordId, progress_step};

/// A stored tracking record, one row per order.
///
/// `order_items` is kept as the opaque JSON blob exactly as persisted;
/// views deserialize it on the way out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackingRecord {
    /// Surrogate key, assigned by the store, never reused.
    pub id: RecordId,
    /// Upstream order number; unique across the table.
    pub order_id: OrderId,
    /// Carrier tracking number. Indexed but not unique.
    pub tracking_number: String,
    /// Free-text status; recognized values drive the progress indicator.
    pub status: String,
    /// Customer email, or empty string when absent/invalid.
    pub customer_email: String,
    /// Order total with 2 fractional digits.
    pub order_total: Decimal,
    /// Currency code, e.g. "USD".
    pub currency: String,
    /// Opaque JSON blob of `{name, quantity}` items.
    pub order_items: String,
    /// Set on first insert, never modified afterwards.
    pub date_created: DateTime<Utc>,
    /// Set on every insert or update.
    pub date_updated: DateTime<Utc>,
}

impl TrackingRecord {
    /// Deserialize the stored item blob.
    ///
    /// An empty blob reads as an empty list; anything else must be valid
    /// JSON or the record is considered corrupted.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the blob is not valid JSON.
    pub fn parsed_items(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.order_items.trim().is_empty() {
            return Ok(serde_json::Value::Array(Vec::new()));
        }
        serde_json::from_str(&self.order_items)
    }
}

/// Normalized webhook data ready for the upsert.
///
/// `date_created` only takes effect on first insert; conflicts keep the
/// existing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackingRecord {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub status: String,
    pub customer_email: String,
    pub order_total: Decimal,
    pub currency: String,
    pub order_items: String,
    pub date_created: DateTime<Utc>,
    /// Ingest timestamp; written on insert and on every conflict update so
    /// both columns come from the same clock.
    pub date_updated: DateTime<Utc>,
}

/// Full record view for the authenticated operator read path.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: RecordId,
    pub order_id: OrderId,
    pub tracking_number: String,
    pub status: String,
    pub customer_email: String,
    pub order_total: Decimal,
    pub currency: String,
    pub order_items: serde_json::Value,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl TryFrom<TrackingRecord> for OrderView {
    type Error = serde_json::Error;

    fn try_from(record: TrackingRecord) -> Result<Self, Self::Error> {
        let order_items = record.parsed_items()?;
        Ok(Self {
            id: record.id,
            order_id: record.order_id,
            tracking_number: record.tracking_number,
            status: record.status,
            customer_email: record.customer_email,
            order_total: record.order_total,
            currency: record.currency,
            order_items,
            date_created: record.date_created,
            date_updated: record.date_updated,
        })
    }
}

/// Redacted record view for the public tracking read path.
///
/// `customer_email` is deliberately absent from this struct so it can
/// never leak through serialization. `progress_step` drives the 4-stage
/// display on the tracking page.
#[derive(Debug, Serialize)]
pub struct PublicTrackingView {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub status: String,
    pub progress_step: u8,
    pub order_total: Decimal,
    pub currency: String,
    pub order_items: serde_json::Value,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl TryFrom<TrackingRecord> for PublicTrackingView {
    type Error = serde_json::Error;

    fn try_from(record: TrackingRecord) -> Result<Self, Self::Error> {
        let order_items = record.parsed_items()?;
        let progress_step = progress_step(&record.status);
        Ok(Self {
            order_id: record.order_id,
            tracking_number: record.tracking_number,
            status: record.status,
            progress_step,
            order_total: record.order_total,
            currency: record.currency,
            order_items,
            date_created: record.date_created,
            date_updated: record.date_updated,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> TrackingRecord {
        let now = Utc::now();
        TrackingRecord {
            id: RecordId::new(1),
            order_id: OrderId::new(100),
            tracking_number: "TRK1".to_string(),
            status: "shipped".to_string(),
            customer_email: "buyer@example.com".to_string(),
            order_total: Decimal::new(4999, 2),
            currency: "USD".to_string(),
            order_items: r#"[{"name":"Widget","quantity":2}]"#.to_string(),
            date_created: now,
            date_updated: now,
        }
    }

    #[test]
    fn test_parsed_items() {
        let record = sample_record();
        let items = record.parsed_items().unwrap();
        assert_eq!(items, json!([{"name": "Widget", "quantity": 2}]));
    }

    #[test]
    fn test_parsed_items_empty_blob() {
        let mut record = sample_record();
        record.order_items = String::new();
        assert_eq!(record.parsed_items().unwrap(), json!([]));
    }

    #[test]
    fn test_parsed_items_invalid_blob() {
        let mut record = sample_record();
        record.order_items = "{not json".to_string();
        assert!(record.parsed_items().is_err());
    }

    #[test]
    fn test_order_view_includes_email() {
        let view = OrderView::try_from(sample_record()).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["customer_email"], "buyer@example.com");
        assert_eq!(json["order_id"], 100);
        assert_eq!(json["order_items"][0]["quantity"], 2);
    }

    #[test]
    fn test_public_view_redacts_email() {
        let view = PublicTrackingView::try_from(sample_record()).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("customer_email").is_none());
        assert_eq!(json["tracking_number"], "TRK1");
        assert_eq!(json["progress_step"], 3);
    }

    #[test]
    fn test_public_view_unknown_status_has_no_progress() {
        let mut record = sample_record();
        record.status = "on-hold".to_string();
        let view = PublicTrackingView::try_from(record).unwrap();
        assert_eq!(view.progress_step, 0);
    }
}
