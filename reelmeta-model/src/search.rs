use crate::ids::RemoteId;
use crate::provider_ids::ProviderIds;

/// Lightweight preview used by disambiguation UIs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteSearchResult {
    pub remote_id: RemoteId,
    pub name: String,
    pub overview: Option<String>,
    pub image_url: Option<String>,
    pub provider_ids: ProviderIds,
}
