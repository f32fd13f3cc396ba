use cbzz_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("no images found in {0}")]
    EmptyArchive(String),
    #[error("failed to extract images from {0}")]
    ExtractionFailed(String),
    #[error("invalid backup file format: {0}")]
    InvalidFormat(String),
    #[error("no comics to export")]
    NothingToExport,
    #[error("no comics in library")]
    EmptyLibrary,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("decode error: {0}")]
    Decode(String),
}
