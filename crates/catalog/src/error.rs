#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    Fetch(String),
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "data source not found"),
            CatalogError::Fetch(msg) => write!(f, "data fetch failed: {msg}"),
            CatalogError::Corrupt(msg) => write!(f, "data malformed: {msg}"),
            CatalogError::Io(msg) => write!(f, "data read error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Unavailable,
    InvalidKey(String),
    Io(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "local storage unavailable"),
            StorageError::InvalidKey(key) => write!(f, "invalid storage key: {key:?}"),
            StorageError::Io(msg) => write!(f, "local storage error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}
