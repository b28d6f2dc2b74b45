use catalog::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    Http(String),
    Status(u16),
    Malformed(String),
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::Http(msg) => write!(f, "geocoding request failed: {msg}"),
            GeocodeError::Status(code) => write!(f, "geocoding service returned HTTP {code}"),
            GeocodeError::Malformed(msg) => write!(f, "geocoding response malformed: {msg}"),
        }
    }
}

impl std::error::Error for GeocodeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    Storage(StorageError),
    Encode(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Storage(e) => write!(f, "geocode cache storage: {e}"),
            CacheError::Encode(msg) => write!(f, "geocode cache encode: {msg}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Storage(e) => Some(e),
            CacheError::Encode(_) => None,
        }
    }
}

impl From<StorageError> for CacheError {
    fn from(e: StorageError) -> Self {
        CacheError::Storage(e)
    }
}
