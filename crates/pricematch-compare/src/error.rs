use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("no sources configured")]
    NoSources,

    #[error("source client error: {0}")]
    Source(#[from] pricematch_sources::SourceError),
}
