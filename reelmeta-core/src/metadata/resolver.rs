use std::fmt;
use std::sync::Arc;

use reelmeta_model::{LookupRequest, RecordKind, RemoteId};

use crate::providers::{MetadataSource, ProviderError, SearchQuery};

/// Outcome of identifier resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(RemoteId),
    Unresolved,
}

impl Resolution {
    pub fn remote_id(&self) -> Option<RemoteId> {
        match self {
            Resolution::Resolved(id) => Some(*id),
            Resolution::Unresolved => None,
        }
    }
}

/// Turns a partial [`LookupRequest`] into a remote id.
///
/// Issues at most one search per call and never retries.
#[derive(Clone)]
pub struct IdentifierResolver {
    source: Arc<dyn MetadataSource>,
}

impl fmt::Debug for IdentifierResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierResolver")
            .field("source", &self.source.name())
            .finish()
    }
}

impl IdentifierResolver {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    pub async fn resolve(
        &self,
        kind: RecordKind,
        request: &LookupRequest,
    ) -> Result<Resolution, ProviderError> {
        if let Some(id) = request.known_remote_id() {
            tracing::debug!(%kind, %id, "using existing remote id");
            return Ok(Resolution::Resolved(id));
        }

        if request.is_automated {
            tracing::debug!(
                %kind,
                name = %request.display_name,
                "automated lookup without id, skipping search"
            );
            return Ok(Resolution::Unresolved);
        }

        // Seasons are only reachable through their series id.
        if kind == RecordKind::Season {
            return Ok(Resolution::Unresolved);
        }

        let name = request.display_name.trim();
        if name.is_empty() {
            return Ok(Resolution::Unresolved);
        }

        let hits = self.source.search(SearchQuery::new(kind, name)).await?;
        match hits.into_iter().next() {
            Some(hit) => {
                tracing::info!(
                    %kind,
                    query = name,
                    id = %hit.remote_id,
                    matched = %hit.display_name,
                    "resolved by search"
                );
                Ok(Resolution::Resolved(hit.remote_id))
            }
            None => {
                tracing::debug!(%kind, query = name, "search returned no matches");
                Ok(Resolution::Unresolved)
            }
        }
    }
}
