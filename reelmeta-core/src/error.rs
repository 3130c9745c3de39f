use thiserror::Error;

use crate::providers::ProviderError;

/// Failures surfaced by the pipeline's caller-facing operations.
///
/// `Unresolved` and not-found outcomes are not errors; see
/// [`crate::pipeline::Enrichment`].
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Transport error: {0}")]
    Transport(#[from] ProviderError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl MetadataError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MetadataError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
