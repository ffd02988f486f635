pub mod currency;
pub mod favorites;
pub mod flights;
pub mod hotels;
pub mod provider;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Upstream provider error: {0}")]
    UpstreamError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Round to two decimal places, matching the wire format of quoted prices.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
