use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use arc_swap::ArcSwap;
use imbl::OrdMap;

use crate::error::StoreError;
use crate::mutation::{ColumnOp, Mutation};
use crate::store::MetaStore;

type Family = OrdMap<Vec<u8>, Vec<u8>>;

/// In-memory reference backend.
///
/// Each column family is a persistent ordered map behind an `ArcSwap`;
/// readers load a snapshot per access and never block. A single writer lock
/// serializes mutations, so concurrent `apply` calls never interleave.
/// Readers observe per-family snapshots — a mutation spanning families may be
/// visible family by family for an instant, which matches the row-level
/// consistency the metadata layer relies on.
pub struct MemoryStore {
    families: RwLock<HashMap<String, Arc<ArcSwap<Family>>>>,
    write_lock: Mutex<()>,
}

/// Keys inside a family are `[row_len: u16 BE][row][qualifier]`. The length
/// prefix keeps rows with embedded separators from colliding and keeps all
/// columns of a row contiguous in qualifier order.
fn encode_key(row: &[u8], qualifier: &[u8]) -> Result<Vec<u8>, StoreError> {
    let len = u16::try_from(row.len())
        .map_err(|_| StoreError::Storage(format!("row too long: {} bytes", row.len())))?;
    let mut buf = Vec::with_capacity(2 + row.len() + qualifier.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(row);
    buf.extend_from_slice(qualifier);
    Ok(buf)
}

fn row_prefix(row: &[u8]) -> Result<Vec<u8>, StoreError> {
    encode_key(row, &[])
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            families: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    fn family(&self, name: &str) -> Result<Arc<ArcSwap<Family>>, StoreError> {
        let families = self.families.read().unwrap();
        families
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::FamilyNotFound(name.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaStore for MemoryStore {
    fn create_family(&self, name: &str) -> Result<(), StoreError> {
        let mut families = self.families.write().unwrap();
        families
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(ArcSwap::new(Arc::new(OrdMap::new()))));
        Ok(())
    }

    fn apply(&self, mutation: &Mutation) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Storage(format!("write lock poisoned: {e}")))?;

        // Resolve every family up front so an unknown family rejects the
        // whole mutation before any write happens.
        let mut touched: HashMap<&str, (Arc<ArcSwap<Family>>, Family)> = HashMap::new();
        for update in mutation.updates() {
            if !touched.contains_key(update.family) {
                let handle = self.family(update.family)?;
                let data = (**handle.load()).clone();
                touched.insert(update.family, (handle, data));
            }
        }

        for update in mutation.updates() {
            let key = encode_key(mutation.row(), &update.qualifier)?;
            let (_, data) = touched.get_mut(update.family).unwrap();
            match &update.op {
                ColumnOp::Put(value) => {
                    data.insert(key, value.clone());
                }
                ColumnOp::Delete => {
                    data.remove(&key);
                }
            }
        }

        for (_, (handle, data)) in touched {
            handle.store(Arc::new(data));
        }
        Ok(())
    }

    fn get(
        &self,
        family: &str,
        row: &[u8],
        qualifier: &[u8],
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let handle = self.family(family)?;
        let key = encode_key(row, qualifier)?;
        Ok(handle.load().get(&key).cloned())
    }

    fn scan_row(&self, family: &str, row: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let handle = self.family(family)?;
        let prefix = row_prefix(row)?;
        let data = handle.load();
        let pairs = data
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (k[prefix.len()..].to_vec(), v.clone()))
            .collect();
        Ok(pairs)
    }
}
