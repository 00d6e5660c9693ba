//! Core types for Waypost.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod api_key;
pub mod email;
pub mod id;
pub mod status;

pub use api_key::ApiKey;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::{OrderStatus, progress_step};
