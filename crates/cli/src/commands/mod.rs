//! CLI command implementations.

pub mod apikey;
pub mod migrate;
