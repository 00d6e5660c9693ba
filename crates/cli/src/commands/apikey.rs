//! Webhook API key management commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the current key (generating one on first use)
//! waypost-cli apikey show
//!
//! # Replace the key; senders must be reconfigured immediately
//! waypost-cli apikey rotate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

use waypost_server::db::CredentialRepository;

/// Errors that can occur during API key operations.
#[derive(Debug, Error)]
pub enum ApiKeyError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] waypost_server::db::RepositoryError),
}

/// Print the current API key, generating one if none exists yet.
///
/// # Errors
///
/// Returns `ApiKeyError` if the database is unreachable.
pub async fn show() -> Result<(), ApiKeyError> {
    let pool = connect().await?;

    let key = CredentialRepository::new(&pool).get_or_create().await?;

    // The raw key goes to stdout so it can be piped into sender config.
    #[allow(clippy::print_stdout)]
    {
        println!("{key}");
    }
    Ok(())
}

/// Rotate the API key and print the new value.
///
/// The previous key stops working the moment this command completes.
///
/// # Errors
///
/// Returns `ApiKeyError` if the database is unreachable.
pub async fn rotate() -> Result<(), ApiKeyError> {
    let pool = connect().await?;

    let key = CredentialRepository::new(&pool).rotate().await?;

    tracing::warn!("API key rotated; update all webhook senders");
    #[allow(clippy::print_stdout)]
    {
        println!("{key}");
    }
    Ok(())
}

async fn connect() -> Result<PgPool, ApiKeyError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| ApiKeyError::MissingEnvVar("DATABASE_URL"))?;

    Ok(PgPool::connect(&database_url).await?)
}
