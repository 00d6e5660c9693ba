//! Domain models for the receiver.

pub mod tracking;

pub use tracking::{NewTrackingRecord, OrderView, PublicTrackingView, TrackingRecord};
