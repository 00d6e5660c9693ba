//! Webhook ingest and operator order reads.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use waypost_core::OrderId;

use crate::db::{RepositoryError, TrackingRepository, tracking::ListQuery};
use crate::error::{AppError, AppJson};
use crate::middleware::auth::{self, ApiKeyParams, RequireApiKey};
use crate::models::OrderView;
use crate::services::ingest::{IngestPayload, normalize};
use crate::state::AppState;

/// Acknowledgement returned for a stored webhook.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: &'static str,
    pub order_id: OrderId,
}

/// Query parameters for the order listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Free-text search: exact order ID, or substring of tracking number
    /// or customer email.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page (capped server-side).
    pub per_page: Option<u32>,
}

/// One page of full records for the admin table.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderView>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Receive an order-tracking webhook and upsert its record.
///
/// Authentication accepts the key from the `X-API-Key` header, the
/// `api_key` query parameter, or the `api_key` body field; any one match
/// suffices. The upsert is atomic per `order_id`.
#[instrument(skip_all)]
pub async fn ingest(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParams>,
    headers: HeaderMap,
    AppJson(payload): AppJson<IngestPayload>,
) -> Result<Json<IngestResponse>, AppError> {
    auth::authenticate(
        &state,
        &[
            auth::header_key(&headers),
            params.api_key.as_deref(),
            payload.api_key.as_deref(),
        ],
    )
    .await?;

    let normalized = normalize(&payload, Utc::now())?;

    let record = TrackingRepository::new(state.pool())
        .upsert(&normalized)
        .await?;

    tracing::info!(order_id = %record.order_id, "tracking record upserted");

    Ok(Json(IngestResponse {
        success: true,
        message: "Order tracking data saved successfully",
        order_id: record.order_id,
    }))
}

/// Full record by order ID (operator read path).
#[instrument(skip(state))]
pub async fn get_order(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderView>, AppError> {
    let record = TrackingRepository::new(state.pool())
        .get_by_order_id(OrderId::new(order_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    let view = OrderView::try_from(record).map_err(|e| {
        AppError::from(RepositoryError::DataCorruption(format!(
            "invalid order_items blob for order {order_id}: {e}"
        )))
    })?;

    Ok(Json(view))
}

/// Paginated, searchable listing for the admin table.
#[instrument(skip(state))]
pub async fn list(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let page = TrackingRepository::new(state.pool())
        .list(&ListQuery {
            search: query.search,
            page: query.page.unwrap_or(1),
            per_page: query.per_page.unwrap_or(0),
        })
        .await?;

    let orders = page
        .records
        .into_iter()
        .map(|record| {
            let order_id = record.order_id;
            OrderView::try_from(record).map_err(|e| {
                AppError::from(RepositoryError::DataCorruption(format!(
                    "invalid order_items blob for order {order_id}: {e}"
                )))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(OrderListResponse {
        orders,
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}
