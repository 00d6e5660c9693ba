//! Webhook payload validation and normalization.
//!
//! Senders vary wildly in how strictly they type their payloads, so the
//! coercions here are deliberately permissive: numbers may arrive as JSON
//! numbers or strings, bad order IDs collapse to zero rather than
//! rejecting the request, and malformed emails are dropped instead of
//! failing the ingest. Only `order_id` and `tracking_number` are hard
//! requirements.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde_json::Value;

use waypost_core::{Email, OrderId, sanitize::sanitize_text};

use crate::error::AppError;
use crate::models::NewTrackingRecord;

/// Fallback timestamp format accepted alongside RFC 3339.
const LEGACY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw webhook body, before validation.
///
/// `order_id` and `order_total` accept any JSON value because senders mix
/// numbers and strings. `api_key` rides along for body-parameter
/// authentication and never reaches storage.
#[derive(Debug, Default, Deserialize)]
pub struct IngestPayload {
    pub order_id: Option<Value>,
    pub tracking_number: Option<String>,
    pub status: Option<String>,
    pub customer_email: Option<String>,
    pub order_total: Option<Value>,
    pub currency: Option<String>,
    pub date_created: Option<String>,
    pub items: Option<Value>,
    pub api_key: Option<String>,
}

/// Validate required fields and normalize the payload for the upsert.
///
/// `now` is the ingest timestamp. It always becomes `date_updated`, and
/// also `date_created` when the sender omits one or sends something
/// unparsable, so a fresh insert carries identical timestamps from a
/// single clock.
///
/// # Errors
///
/// Returns `AppError::MissingData` naming the missing field(s) when
/// `order_id` or `tracking_number` is absent or empty. All other problems
/// are coerced away rather than rejected.
pub fn normalize(
    payload: &IngestPayload,
    now: DateTime<Utc>,
) -> Result<NewTrackingRecord, AppError> {
    let mut missing = Vec::new();
    if is_missing(payload.order_id.as_ref()) {
        missing.push("order_id");
    }
    if payload
        .tracking_number
        .as_deref()
        .is_none_or(|t| t.trim().is_empty())
    {
        missing.push("tracking_number");
    }
    if !missing.is_empty() {
        return Err(AppError::MissingData(missing.join(", ")));
    }

    let order_id = coerce_order_id(payload.order_id.as_ref());
    let tracking_number = sanitize_text(payload.tracking_number.as_deref().unwrap_or_default());

    let status = payload
        .status
        .as_deref()
        .map_or_else(|| "pending".to_string(), sanitize_text);
    let currency = payload
        .currency
        .as_deref()
        .map_or_else(|| "USD".to_string(), sanitize_text);

    let customer_email = payload
        .customer_email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
        .map_or_else(String::new, Email::into_inner);

    let order_total = coerce_total(payload.order_total.as_ref());
    let date_created = parse_date_created(payload.date_created.as_deref(), now);

    let order_items = payload
        .items
        .as_ref()
        .map_or_else(|| "[]".to_string(), |items| items.to_string());

    Ok(NewTrackingRecord {
        order_id,
        tracking_number,
        status,
        customer_email,
        order_total,
        currency,
        order_items,
        date_created,
        date_updated: now,
    })
}

/// A required field is missing when absent, JSON null, or an empty string.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Coerce an arbitrary JSON value to an order ID.
///
/// Numeric strings parse; floats truncate; anything non-numeric or
/// negative becomes zero. This permissiveness is contract, not accident.
#[allow(clippy::cast_possible_truncation)] // truncation is the documented coercion
fn coerce_order_id(value: Option<&Value>) -> OrderId {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    };
    OrderId::from_raw(raw)
}

/// Coerce an arbitrary JSON value to a 2-decimal order total.
///
/// Absent or unparsable totals become zero.
fn coerce_total(value: Option<&Value>) -> Decimal {
    let total = match value {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().unwrap_or_default(),
        _ => Decimal::ZERO,
    };
    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a caller-supplied creation timestamp, falling back to `now`.
///
/// Accepts RFC 3339 or the legacy `YYYY-MM-DD HH:MM:SS` form (taken as
/// UTC).
fn parse_date_created(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return now;
    };
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, LEGACY_DATETIME_FORMAT) {
        return parsed.and_utc();
    }

    now
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn payload(body: Value) -> IngestPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_minimal_payload_defaults() {
        let normalized = normalize(
            &payload(json!({"order_id": 100, "tracking_number": "TRK1"})),
            now(),
        )
        .unwrap();

        assert_eq!(normalized.order_id, OrderId::new(100));
        assert_eq!(normalized.tracking_number, "TRK1");
        assert_eq!(normalized.status, "pending");
        assert_eq!(normalized.currency, "USD");
        assert_eq!(normalized.customer_email, "");
        assert_eq!(normalized.order_total, Decimal::ZERO);
        assert_eq!(normalized.order_items, "[]");
        // Both timestamps come from the same ingest clock, so a fresh
        // insert stores date_created == date_updated exactly.
        assert_eq!(normalized.date_created, now());
        assert_eq!(normalized.date_updated, now());
    }

    #[test]
    fn test_full_payload() {
        let normalized = normalize(
            &payload(json!({
                "order_id": "100",
                "tracking_number": " TRK1 ",
                "status": "shipped",
                "customer_email": "buyer@example.com",
                "order_total": 49.99,
                "currency": "EUR",
                "date_created": "2026-07-15T09:30:00Z",
                "items": [{"name": "Widget", "quantity": 2}],
            })),
            now(),
        )
        .unwrap();

        assert_eq!(normalized.order_id, OrderId::new(100));
        assert_eq!(normalized.tracking_number, "TRK1");
        assert_eq!(normalized.status, "shipped");
        assert_eq!(normalized.customer_email, "buyer@example.com");
        assert_eq!(normalized.order_total, Decimal::new(4999, 2));
        assert_eq!(normalized.currency, "EUR");
        assert_eq!(
            normalized.date_created,
            Utc.with_ymd_and_hms(2026, 7, 15, 9, 30, 0).unwrap()
        );
        assert_eq!(normalized.date_updated, now());
        assert_eq!(
            normalized.order_items,
            r#"[{"name":"Widget","quantity":2}]"#
        );
    }

    #[test]
    fn test_missing_order_id() {
        let err = normalize(&payload(json!({"tracking_number": "TRK1"})), now()).unwrap_err();
        assert!(matches!(err, AppError::MissingData(ref f) if f == "order_id"));
    }

    #[test]
    fn test_missing_tracking_number() {
        let err = normalize(&payload(json!({"order_id": 100})), now()).unwrap_err();
        assert!(matches!(err, AppError::MissingData(ref f) if f == "tracking_number"));
    }

    #[test]
    fn test_missing_both_names_both() {
        let err = normalize(&payload(json!({})), now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingData(ref f) if f == "order_id, tracking_number"
        ));
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let err = normalize(
            &payload(json!({"order_id": "  ", "tracking_number": ""})),
            now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingData(ref f) if f == "order_id, tracking_number"
        ));
    }

    #[test]
    fn test_order_id_coercion() {
        assert_eq!(coerce_order_id(Some(&json!(42))), OrderId::new(42));
        assert_eq!(coerce_order_id(Some(&json!("42"))), OrderId::new(42));
        assert_eq!(coerce_order_id(Some(&json!(12.7))), OrderId::new(12));
        // Non-numeric and negative values collapse to zero.
        assert_eq!(coerce_order_id(Some(&json!("abc"))), OrderId::new(0));
        assert_eq!(coerce_order_id(Some(&json!(-5))), OrderId::new(0));
        assert_eq!(coerce_order_id(Some(&json!(true))), OrderId::new(0));
    }

    #[test]
    fn test_total_coercion() {
        assert_eq!(coerce_total(Some(&json!(49.99))), Decimal::new(4999, 2));
        assert_eq!(coerce_total(Some(&json!("49.99"))), Decimal::new(4999, 2));
        assert_eq!(coerce_total(Some(&json!("garbage"))), Decimal::ZERO);
        assert_eq!(coerce_total(None), Decimal::ZERO);
        // Rounded to 2 fractional digits, half away from zero.
        assert_eq!(coerce_total(Some(&json!(1.005))), Decimal::new(101, 2));
    }

    #[test]
    fn test_invalid_email_stored_empty() {
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "T",
                "customer_email": "not-an-email",
            })),
            now(),
        )
        .unwrap();
        assert_eq!(normalized.customer_email, "");
    }

    #[test]
    fn test_text_fields_sanitized() {
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "<b>TRK1</b>",
                "status": "ship\u{7}ped",
            })),
            now(),
        )
        .unwrap();
        assert_eq!(normalized.tracking_number, "TRK1");
        assert_eq!(normalized.status, "shipped");
    }

    #[test]
    fn test_legacy_date_format() {
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "T",
                "date_created": "2026-07-15 09:30:00",
            })),
            now(),
        )
        .unwrap();
        assert_eq!(
            normalized.date_created,
            Utc.with_ymd_and_hms(2026, 7, 15, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_unparsable_date_falls_back_to_now() {
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "T",
                "date_created": "last tuesday",
            })),
            now(),
        )
        .unwrap();
        assert_eq!(normalized.date_created, now());
    }

    #[test]
    fn test_items_serialized_verbatim() {
        // Sub-fields are not validated; whatever arrives is stored.
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "T",
                "items": [{"name": "Widget"}, {"quantity": "3"}],
            })),
            now(),
        )
        .unwrap();
        assert_eq!(
            normalized.order_items,
            r#"[{"name":"Widget"},{"quantity":"3"}]"#
        );
    }

    #[test]
    fn test_api_key_not_persisted() {
        let normalized = normalize(
            &payload(json!({
                "order_id": 1,
                "tracking_number": "T",
                "api_key": "supersecret",
            })),
            now(),
        )
        .unwrap();
        assert!(!normalized.order_items.contains("supersecret"));
    }
}
