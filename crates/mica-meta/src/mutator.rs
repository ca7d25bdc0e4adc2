use mica_store::Mutation;

use crate::error::MetaError;
use crate::extent::KeyExtent;
use crate::schema;
use crate::values::{
    DataFileValue, ExternalCompactionId, ExternalCompactionMeta, Location, LockId, LogEntry,
    MetadataTime, SuspendingServer, encode_prev_end_row, format_tx_id,
};

/// Accumulates one atomic set of column edits against a single tablet's
/// metadata record.
///
/// A mutator is single-use: populate it with field edits, then hand it to
/// [`MetaWriter::submit`](crate::MetaWriter::submit) (or call [`finish`]
/// directly) exactly once. Every setter is pure in-memory accumulation — no
/// I/O happens until the finished mutation is applied. Calling a setter after
/// the mutation has been taken is a lifecycle bug in the calling workflow and
/// panics.
///
/// Setters perform no de-duplication: repeated edits to the same column are
/// kept in call order and the last one wins at the store layer.
///
/// [`finish`]: TabletMutator::finish
pub struct TabletMutator {
    mutation: Mutation,
    updates_enabled: bool,
    close_after_mutate: Option<Box<dyn FnOnce() + Send>>,
}

impl TabletMutator {
    pub fn new(extent: &KeyExtent) -> Self {
        Self {
            mutation: Mutation::new(extent.meta_row()),
            updates_enabled: true,
            close_after_mutate: None,
        }
    }

    fn check_updates_enabled(&self) {
        assert!(
            self.updates_enabled,
            "cannot make updates after the mutation is finished"
        );
    }

    pub fn put_prev_end_row(&mut self, prev: Option<&[u8]>) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put(
            schema::TABLET_FAMILY,
            schema::PREV_ROW_QUAL,
            encode_prev_end_row(prev),
        );
        self
    }

    /// The only fallible setter besides [`put_external_compaction`]: the
    /// directory name is validated before anything is accumulated, so a
    /// rejected name leaves the pending set untouched.
    ///
    /// [`put_external_compaction`]: TabletMutator::put_external_compaction
    pub fn put_dir_name(&mut self, dir: &str) -> Result<&mut Self, MetaError> {
        schema::validate_dir_name(dir)?;
        self.check_updates_enabled();
        self.mutation
            .put(schema::SERVER_FAMILY, schema::DIRECTORY_QUAL, dir);
        Ok(self)
    }

    pub fn put_file(&mut self, path: &str, dfv: &DataFileValue) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::DATA_FILE_FAMILY, path, dfv.encode());
        self
    }

    pub fn delete_file(&mut self, path: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put_delete(schema::DATA_FILE_FAMILY, path);
        self
    }

    pub fn put_scan(&mut self, path: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put(schema::SCAN_FILE_FAMILY, path, "");
        self
    }

    pub fn delete_scan(&mut self, path: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put_delete(schema::SCAN_FILE_FAMILY, path);
        self
    }

    pub fn put_compaction_id(&mut self, id: u64) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::SERVER_FAMILY, schema::COMPACT_QUAL, id.to_string());
        self
    }

    pub fn put_flush_id(&mut self, id: u64) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::SERVER_FAMILY, schema::FLUSH_QUAL, id.to_string());
        self
    }

    pub fn put_time(&mut self, time: &MetadataTime) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::SERVER_FAMILY, schema::TIME_QUAL, time.encode());
        self
    }

    pub fn put_location(&mut self, location: &Location) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put(
            location.kind.family(),
            location.session.as_str(),
            location.host_port.as_str(),
        );
        self
    }

    pub fn delete_location(&mut self, location: &Location) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put_delete(location.kind.family(), location.session.as_str());
        self
    }

    pub fn put_lock(&mut self, lock: &LockId, root: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put(
            schema::SERVER_FAMILY,
            schema::LOCK_QUAL,
            lock.serialize(root),
        );
        self
    }

    pub fn put_wal(&mut self, entry: &LogEntry) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::LOG_FAMILY, entry.qualifier(), entry.value());
        self
    }

    pub fn delete_wal(&mut self, entry: &LogEntry) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put_delete(schema::LOG_FAMILY, entry.qualifier());
        self
    }

    /// Delete a log reference by its raw qualifier string, for callers that
    /// only hold the identifier read back from the record.
    pub fn delete_wal_id(&mut self, id: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put_delete(schema::LOG_FAMILY, id);
        self
    }

    pub fn put_bulk_file(&mut self, path: &str, tid: u64) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put(schema::BULK_FILE_FAMILY, path, format_tx_id(tid));
        self
    }

    pub fn delete_bulk_file(&mut self, path: &str) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put_delete(schema::BULK_FILE_FAMILY, path);
        self
    }

    pub fn put_suspension(&mut self, server: &SuspendingServer) -> &mut Self {
        self.check_updates_enabled();
        self.mutation.put(
            schema::SUSPEND_FAMILY,
            schema::SUSPEND_QUAL,
            server.encode(),
        );
        self
    }

    pub fn delete_suspension(&mut self) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put_delete(schema::SUSPEND_FAMILY, schema::SUSPEND_QUAL);
        self
    }

    pub fn put_external_compaction(
        &mut self,
        ecid: &ExternalCompactionId,
        meta: &ExternalCompactionMeta,
    ) -> Result<&mut Self, MetaError> {
        self.check_updates_enabled();
        self.mutation.put(
            schema::EXTERNAL_COMPACTION_FAMILY,
            ecid.canonical(),
            meta.to_json()?,
        );
        Ok(self)
    }

    pub fn delete_external_compaction(&mut self, ecid: &ExternalCompactionId) -> &mut Self {
        self.check_updates_enabled();
        self.mutation
            .put_delete(schema::EXTERNAL_COMPACTION_FAMILY, ecid.canonical());
        self
    }

    /// Attach an action released by the owning workflow once the mutation has
    /// been submitted, success or failure — typically a held conditional-write
    /// handle. Never invoked by [`finish`] itself.
    ///
    /// [`finish`]: TabletMutator::finish
    pub fn set_close_after_mutate(&mut self, close: impl FnOnce() + Send + 'static) {
        self.close_after_mutate = Some(Box::new(close));
    }

    /// Take the accumulated mutation and move the mutator to its terminal
    /// state. Every later field edit, and a second `finish`, panics.
    pub fn finish(&mut self) -> Mutation {
        self.check_updates_enabled();
        self.updates_enabled = false;
        std::mem::replace(&mut self.mutation, Mutation::new(Vec::new()))
    }

    pub(crate) fn take_close_after_mutate(&mut self) -> Option<Box<dyn FnOnce() + Send>> {
        self.close_after_mutate.take()
    }
}
