use mica_meta::{KeyExtent, MetaWriter};
use mica_store::MemoryStore;

pub fn writer() -> MetaWriter<MemoryStore> {
    MetaWriter::new(MemoryStore::new())
}

pub fn extent(table: &str, end_row: &str) -> KeyExtent {
    KeyExtent::new(table, Some(end_row.as_bytes().to_vec()), None)
}
