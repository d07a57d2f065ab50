#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
