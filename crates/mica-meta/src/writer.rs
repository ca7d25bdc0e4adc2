use mica_store::MetaStore;
use tracing::debug;

use crate::error::MetaError;
use crate::extent::KeyExtent;
use crate::mutator::TabletMutator;
use crate::schema;

/// Owns submission of tablet mutations to the metadata store.
///
/// One writer per store handle; mutators stay pure in-memory builders and
/// this is the only place their accumulated mutation crosses into I/O.
pub struct MetaWriter<S> {
    store: S,
}

impl<S: MetaStore> MetaWriter<S> {
    pub fn new(store: S) -> Self {
        for family in schema::ALL_FAMILIES {
            let _ = store.create_family(family);
        }
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mutate_tablet(&self, extent: &KeyExtent) -> TabletMutator {
        TabletMutator::new(extent)
    }

    /// Finish the mutator and apply its mutation atomically.
    ///
    /// The cleanup action attached via
    /// [`set_close_after_mutate`](TabletMutator::set_close_after_mutate) is
    /// invoked exactly once after the store call returns, whether it
    /// succeeded or failed.
    pub fn submit(&self, mut mutator: TabletMutator) -> Result<(), MetaError> {
        let mutation = mutator.finish();
        debug!(
            row = %String::from_utf8_lossy(mutation.row()),
            updates = mutation.len(),
            "submitting tablet mutation"
        );
        let result = self.store.apply(&mutation).map_err(MetaError::from);
        if let Some(close) = mutator.take_close_after_mutate() {
            close();
        }
        result
    }
}
