use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("malformed path '{0}': {1}")]
    MalformedPath(String, String),

    #[error("type conflict: {0}")]
    TypeConflict(String),

    #[error("cannot coerce value [{value}]: {reason}")]
    Coercion { value: String, reason: String },

    #[error("missing key '{0}' while comparing mapping values")]
    MissingKey(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
