//! Public tracking lookup.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::db::{RepositoryError, TrackingRepository};
use crate::error::AppError;
use crate::models::PublicTrackingView;
use crate::state::AppState;

/// Redacted record by tracking number. Public by design: no API key.
///
/// The response never carries `customer_email`. When several orders share
/// a tracking number the most recently updated one is returned.
#[instrument(skip(state))]
pub async fn get_tracking(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<PublicTrackingView>, AppError> {
    let record = TrackingRepository::new(state.pool())
        .get_by_tracking_number(&tracking_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tracking number {tracking_number}")))?;

    let view = PublicTrackingView::try_from(record).map_err(|e| {
        AppError::from(RepositoryError::DataCorruption(format!(
            "invalid order_items blob for tracking number {tracking_number}: {e}"
        )))
    })?;

    Ok(Json(view))
}
