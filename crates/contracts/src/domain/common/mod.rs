//! Common types and traits for all aggregates

pub mod aggregate_root;
pub mod entity_metadata;
pub mod geo;

// Re-exports
pub use aggregate_root::AggregateRoot;
pub use entity_metadata::EntityMetadata;
pub use geo::{Destination, GeoPoint, Place};

/// Fresh identifier for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
