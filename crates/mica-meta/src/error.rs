use std::fmt;

use mica_store::StoreError;

#[derive(Debug)]
pub enum MetaError {
    InvalidDirectory(String),
    Encoding(String),
    Store(StoreError),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaError::InvalidDirectory(name) => write!(f, "invalid directory name: {name}"),
            MetaError::Encoding(msg) => write!(f, "encoding error: {msg}"),
            MetaError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for MetaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetaError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for MetaError {
    fn from(e: StoreError) -> Self {
        MetaError::Store(e)
    }
}

impl From<serde_json::Error> for MetaError {
    fn from(e: serde_json::Error) -> Self {
        MetaError::Encoding(e.to_string())
    }
}
