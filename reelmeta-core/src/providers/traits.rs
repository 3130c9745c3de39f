use async_trait::async_trait;
use reelmeta_model::{RecordKind, RemoteId};

use super::records::{PersonRecord, SeasonRecord};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Name-based search against the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub kind: RecordKind,
    pub name: String,
}

impl SearchQuery {
    pub fn new(kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// One search match, in the order the remote source ranked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub remote_id: RemoteId,
    pub display_name: String,
    pub thumbnail_path: Option<String>,
}

/// Address of a single remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Person(RemoteId),
    Season { series_id: RemoteId, season_number: u32 },
}

impl RecordKey {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordKey::Person(_) => RecordKind::Person,
            RecordKey::Season { .. } => RecordKind::Season,
        }
    }
}

/// A record fetch with its localisation hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: RecordKey,
    /// Locale for textual fields such as overviews.
    pub language: Option<String>,
    /// Comma separated image languages to include, `null` meaning textless.
    pub image_languages: Option<String>,
}

impl FetchRequest {
    pub fn new(key: RecordKey) -> Self {
        Self {
            key,
            language: None,
            image_languages: None,
        }
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn with_image_languages(mut self, languages: Option<String>) -> Self {
        self.image_languages = languages;
        self
    }
}

/// Raw record returned by a fetch, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRecord {
    Person(PersonRecord),
    Season(SeasonRecord),
}

impl RemoteRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            RemoteRecord::Person(_) => RecordKind::Person,
            RemoteRecord::Season(_) => RecordKind::Season,
        }
    }
}

/// Boundary to the remote metadata source.
///
/// Implementations perform the network calls and parsing; they never
/// retry. A fetch for an id the source does not know returns `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Search by name. Results keep the source's relevance order.
    async fn search(
        &self,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, ProviderError>;

    /// Fetch one record by key.
    async fn fetch(
        &self,
        request: FetchRequest,
    ) -> Result<Option<RemoteRecord>, ProviderError>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}
