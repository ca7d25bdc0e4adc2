mod error;
mod mutation;
mod store;

pub use error::StoreError;
pub use mutation::{ColumnOp, ColumnUpdate, Mutation};
pub use store::MetaStore;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
