mod error;
mod extent;
mod mutator;
pub mod schema;
mod values;
mod writer;

pub use mica_store::{ColumnOp, ColumnUpdate, Mutation};

pub use error::MetaError;
pub use extent::KeyExtent;
pub use mutator::TabletMutator;
pub use values::{
    DataFileValue, ExternalCompactionId, ExternalCompactionMeta, Location, LocationType, LockId,
    LogEntry, MetadataTime, SuspendingServer, decode_prev_end_row, encode_prev_end_row,
    format_tx_id, parse_tx_id,
};
pub use writer::MetaWriter;
