//! Credential store: the single webhook API key.
//!
//! The key lives in a one-row table. Rotation is an atomic upsert of that
//! row, so concurrent rotations race and the last write wins; the previous
//! key stops authenticating the moment the new row commits.

use sqlx::PgPool;

use waypost_core::ApiKey;

use super::RepositoryError;

/// Repository for API credential operations.
pub struct CredentialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CredentialRepository<'a> {
    /// Create a new credential repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the current API key, or `None` if one was never generated.
    ///
    /// An empty stored value counts as never generated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<ApiKey>, RepositoryError> {
        let key: Option<String> =
            sqlx::query_scalar("SELECT api_key FROM api_credentials WHERE id = 1")
                .fetch_optional(self.pool)
                .await?;

        Ok(key.filter(|k| !k.is_empty()).map(ApiKey::new))
    }

    /// Generate and persist a fresh API key, returning it.
    ///
    /// Invalidates the previous key immediately; there is no overlap
    /// window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn rotate(&self) -> Result<ApiKey, RepositoryError> {
        let key = ApiKey::generate();

        sqlx::query(
            r"
            INSERT INTO api_credentials (id, api_key, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE SET api_key = EXCLUDED.api_key, updated_at = NOW()
            ",
        )
        .bind(key.as_str())
        .execute(self.pool)
        .await?;

        Ok(key)
    }

    /// Get the current key, generating one first if none exists.
    ///
    /// Mirrors the lazy creation the settings surface relies on: the first
    /// visit materializes a key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either operation fails.
    pub async fn get_or_create(&self) -> Result<ApiKey, RepositoryError> {
        match self.get().await? {
            Some(key) => Ok(key),
            None => self.rotate().await,
        }
    }
}
