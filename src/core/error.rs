use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SnapshotError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum CountryTableError {
    #[error("I/O error reading country table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed country table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid life expectancy {value} for '{country}'")]
    InvalidLifeExpectancy { country: String, value: f64 },

    #[error("No data available")]
    Empty,
}
