use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    /// Listing found zero records. Surfaced as an error rather than an empty list.
    #[error("There are no users")]
    NoData,

    #[error("Storage error: {0}")]
    Storage(String),

    /// The shared connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound)
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}
