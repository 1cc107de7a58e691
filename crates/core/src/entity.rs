//! Entity trait: the storage identity of a row.

/// A stored row ordered by a storage-assigned sequence id.
pub trait Entity {
    /// Returns the storage-assigned sequence id (monotonic in insertion order).
    fn seq(&self) -> i64;
}
