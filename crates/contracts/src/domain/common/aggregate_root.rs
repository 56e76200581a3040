use super::EntityMetadata;

/// Root of an aggregate stored in its own table.
///
/// Carries the static names used for table prefixes and for user-facing
/// messages such as "Ambulance not found".
pub trait AggregateRoot {
    // ============================================================================
    // Instance data
    // ============================================================================

    /// Record id
    fn id(&self) -> &str;

    /// Lifecycle metadata
    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    // ============================================================================
    // Class metadata
    // ============================================================================

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name used for the table (e.g. "ambulance")
    fn collection_name() -> &'static str;

    /// Singular name shown to users (e.g. "Ambulance")
    fn element_name() -> &'static str;

    /// Plural name shown to users (e.g. "Ambulances")
    fn list_name() -> &'static str;

    // ============================================================================
    // Defaults
    // ============================================================================

    /// Full aggregate name, also the table name (e.g. "a001_ambulance")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Bump `updated_at` and the version before a write
    fn before_write(&mut self) {
        let metadata = self.metadata_mut();
        metadata.touch();
        metadata.increment_version();
    }
}
