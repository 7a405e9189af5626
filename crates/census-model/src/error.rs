use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid person id: {0}")]
    InvalidPersonId(String),
    #[error("invalid gender: {0}")]
    InvalidGender(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
