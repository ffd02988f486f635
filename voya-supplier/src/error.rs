/// Failures talking to the upstream travel-search provider.
///
/// Callers never retry on these; search paths degrade to empty result
/// sets and resolution paths collapse to "not found".
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}
