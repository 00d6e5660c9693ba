//! HTTP route handlers for the receiver.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (DB ping)
//!
//! # Webhook ingest + operator reads (API key required)
//! POST /api/v1/orders                       - Receive tracking webhook
//! GET  /api/v1/orders                       - Paginated/searchable listing
//! GET  /api/v1/orders/{order_id}            - Full record by order ID
//!
//! # Public tracking (no auth)
//! GET  /api/v1/tracking/{tracking_number}   - Redacted record
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod orders;
pub mod tracking;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/orders", post(orders::ingest).get(orders::list))
        .route("/api/v1/orders/{order_id}", get(orders::get_order))
        .route(
            "/api/v1/tracking/{tracking_number}",
            get(tracking::get_tracking),
        )
}
