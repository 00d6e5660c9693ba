//! Tracking record store.
//!
//! One row per order, keyed by the upstream `order_id`. The upsert is a
//! single atomic `INSERT ... ON CONFLICT` guarded by the unique constraint
//! on `order_id`; there is no read-then-write window between two
//! concurrent webhooks for the same order. No delete path exists.

use sqlx::PgPool;

use waypost_core::OrderId;

use super::RepositoryError;
use crate::models::{NewTrackingRecord, TrackingRecord};

/// Columns selected for every record query, in `FromRow` order.
const RECORD_COLUMNS: &str = "id, order_id, tracking_number, status, customer_email, \
     order_total, currency, order_items, date_created, date_updated";

/// Listing parameters for the admin table contract.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Free-text search: exact `order_id`, or substring of
    /// `tracking_number` / `customer_email`.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

impl ListQuery {
    const DEFAULT_PER_PAGE: u32 = 20;
    const MAX_PER_PAGE: u32 = 100;

    fn limit(&self) -> i64 {
        i64::from(self.per_page.clamp(1, Self::MAX_PER_PAGE))
    }

    fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// One page of records plus the total match count.
#[derive(Debug)]
pub struct RecordPage {
    pub records: Vec<TrackingRecord>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Repository for tracking record operations.
pub struct TrackingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TrackingRepository<'a> {
    /// Create a new tracking repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update the record for `new.order_id` in one atomic write.
    ///
    /// On conflict every mutable field is replaced and `date_updated` is
    /// set to the caller's ingest timestamp; `id`, `order_id`, and
    /// `date_created` are never touched. Both timestamp columns are bound
    /// from the same application clock so a fresh insert never stores
    /// `date_updated` earlier than `date_created`, whatever the skew
    /// between the app host and the database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails. Either the
    /// full normalized record commits or the prior row is left unchanged.
    pub async fn upsert(&self, new: &NewTrackingRecord) -> Result<TrackingRecord, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO order_tracking
                (order_id, tracking_number, status, customer_email,
                 order_total, currency, order_items, date_created, date_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (order_id) DO UPDATE SET
                tracking_number = EXCLUDED.tracking_number,
                status          = EXCLUDED.status,
                customer_email  = EXCLUDED.customer_email,
                order_total     = EXCLUDED.order_total,
                currency        = EXCLUDED.currency,
                order_items     = EXCLUDED.order_items,
                date_updated    = EXCLUDED.date_updated
            RETURNING {RECORD_COLUMNS}
            "
        );

        let record = sqlx::query_as::<_, TrackingRecord>(&sql)
            .bind(new.order_id)
            .bind(&new.tracking_number)
            .bind(&new.status)
            .bind(&new.customer_email)
            .bind(new.order_total)
            .bind(&new.currency)
            .bind(&new.order_items)
            .bind(new.date_created)
            .bind(new.date_updated)
            .fetch_one(self.pool)
            .await?;

        Ok(record)
    }

    /// Get the record for an order, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<TrackingRecord>, RepositoryError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM order_tracking WHERE order_id = $1");

        let record = sqlx::query_as::<_, TrackingRecord>(&sql)
            .bind(order_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(record)
    }

    /// Get the record for a tracking number, if any.
    ///
    /// Tracking numbers carry no uniqueness constraint; when several rows
    /// share one, the most recently updated row wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<TrackingRecord>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {RECORD_COLUMNS} FROM order_tracking
            WHERE tracking_number = $1
            ORDER BY date_updated DESC
            LIMIT 1
            "
        );

        let record = sqlx::query_as::<_, TrackingRecord>(&sql)
            .bind(tracking_number)
            .fetch_optional(self.pool)
            .await?;

        Ok(record)
    }

    /// Paginated listing for the admin table, newest updates first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<RecordPage, RepositoryError> {
        let per_page = if query.per_page == 0 {
            ListQuery::DEFAULT_PER_PAGE
        } else {
            query.per_page
        };
        let query = ListQuery {
            per_page,
            ..query.clone()
        };

        let (records, total) = match query.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => self.list_filtered(term, &query).await?,
            _ => self.list_all(&query).await?,
        };

        Ok(RecordPage {
            records,
            total,
            page: query.page.max(1),
            per_page: query.per_page,
        })
    }

    async fn list_all(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<TrackingRecord>, i64), RepositoryError> {
        let sql = format!(
            r"
            SELECT {RECORD_COLUMNS} FROM order_tracking
            ORDER BY date_updated DESC
            LIMIT $1 OFFSET $2
            "
        );

        let records = sqlx::query_as::<_, TrackingRecord>(&sql)
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_tracking")
            .fetch_one(self.pool)
            .await?;

        Ok((records, total))
    }

    async fn list_filtered(
        &self,
        term: &str,
        query: &ListQuery,
    ) -> Result<(Vec<TrackingRecord>, i64), RepositoryError> {
        // A non-numeric term can never match order_id; -1 never occurs.
        let order_id = term.parse::<i64>().unwrap_or(-1);
        let pattern = format!("%{}%", escape_like(term));

        let filter = "order_id = $1 OR tracking_number ILIKE $2 OR customer_email ILIKE $2";

        let sql = format!(
            r"
            SELECT {RECORD_COLUMNS} FROM order_tracking
            WHERE {filter}
            ORDER BY date_updated DESC
            LIMIT $3 OFFSET $4
            "
        );

        let records = sqlx::query_as::<_, TrackingRecord>(&sql)
            .bind(order_id)
            .bind(&pattern)
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM order_tracking WHERE {filter}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(order_id)
            .bind(&pattern)
            .fetch_one(self.pool)
            .await?;

        Ok((records, total))
    }
}

/// Escape `LIKE` metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_list_query_limit_clamped() {
        let query = ListQuery {
            search: None,
            page: 1,
            per_page: 1000,
        };
        assert_eq!(query.limit(), 100);
    }

    #[test]
    fn test_list_query_offset() {
        let query = ListQuery {
            search: None,
            page: 3,
            per_page: 20,
        };
        assert_eq!(query.offset(), 40);

        // Page 0 is treated as page 1.
        let query = ListQuery {
            search: None,
            page: 0,
            per_page: 20,
        };
        assert_eq!(query.offset(), 0);
    }
}
