//! Integration tests for Waypost.
//!
//! # Running Tests
//!
//! These tests exercise a live server and database, so they are
//! `#[ignore]`d by default. To run them:
//!
//! ```bash
//! # Start the database and apply migrations
//! export DATABASE_URL=postgres://localhost/waypost_test
//! cargo run -p waypost-cli -- migrate
//!
//! # Start the server and capture the key
//! export WAYPOST_TEST_API_KEY=$(cargo run -p waypost-cli -- apikey rotate)
//! cargo run -p waypost-server &
//!
//! # Run the ignored tests
//! cargo test -p waypost-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Shared context for end-to-end tests.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub api_key: String,
}

impl TestContext {
    /// Build a context from the test environment.
    ///
    /// # Panics
    ///
    /// Panics if `WAYPOST_TEST_API_KEY` is not set; the server URL
    /// defaults to `http://127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("WAYPOST_TEST_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let api_key = std::env::var("WAYPOST_TEST_API_KEY")
            .expect("WAYPOST_TEST_API_KEY must be set for integration tests");

        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
