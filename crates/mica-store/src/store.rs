use crate::error::StoreError;
use crate::mutation::Mutation;

/// A store holding tablet metadata records, keyed by row within named column
/// families.
///
/// The store is the only component that performs I/O; everything above it
/// builds [`Mutation`] values in memory and hands them over here. Conditional
/// writes, replication, and durability are backend concerns.
pub trait MetaStore {
    /// Create a column family if it does not already exist.
    fn create_family(&self, name: &str) -> Result<(), StoreError>;

    /// Apply all column updates of one mutation as a unit.
    ///
    /// Either every update is applied or none is: unknown families are
    /// rejected before any write happens. Updates are applied in call order,
    /// so the last update for a (family, qualifier) wins.
    fn apply(&self, mutation: &Mutation) -> Result<(), StoreError>;

    /// Read a single column of a row.
    fn get(&self, family: &str, row: &[u8], qualifier: &[u8])
    -> Result<Option<Vec<u8>>, StoreError>;

    /// Read all columns of a row within one family, ordered by qualifier.
    /// Returns (qualifier, value) pairs.
    fn scan_row(&self, family: &str, row: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}
