//! Waypost Core - Shared types library.
//!
//! This crate provides common types used across all Waypost components:
//! - `server` - Webhook receiver and lookup API
//! - `cli` - Command-line tools for migrations and key management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, API keys, and order status
//! - [`sanitize`] - Plain-text sanitization for webhook-supplied strings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod sanitize;
pub mod types;

pub use types::*;
