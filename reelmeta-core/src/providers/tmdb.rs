use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reelmeta_model::{RecordKind, RemoteId};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::image_url::{ImageUrlBuilder, TMDB_IMAGE_BASE, TmdbImageSize};
use super::records::{PersonRecord, SearchResponse, SeasonRecord};
use super::traits::{
    FetchRequest, MetadataSource, ProviderError, RecordKey, RemoteRecord,
    SearchHit, SearchQuery,
};

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

const PERSON_APPEND: &str = "images,external_ids";
const SEASON_APPEND: &str = "credits,images,external_ids";

fn default_api_base() -> String {
    TMDB_API_BASE.to_string()
}

fn default_image_base() -> String {
    TMDB_IMAGE_BASE.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// Connection settings for the TMDB source.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbSettings {
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
    pub poster_size: TmdbImageSize,
    pub profile_size: TmdbImageSize,
    /// Used by callers that have no preferred locale of their own.
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            image_base: default_image_base(),
            poster_size: TmdbImageSize::Original,
            profile_size: TmdbImageSize::Original,
            default_language: default_language(),
        }
    }
}

impl fmt::Debug for TmdbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("api_base", &self.api_base)
            .field("image_base", &self.image_base)
            .field("poster_size", &self.poster_size)
            .field("profile_size", &self.profile_size)
            .field("default_language", &self.default_language)
            .finish()
    }
}

impl TmdbSettings {
    pub fn image_urls(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(
            self.image_base.clone(),
            self.poster_size,
            self.profile_size,
        )
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// [`MetadataSource`] backed by the TMDB v3 REST API.
pub struct TmdbSource {
    api_key: String,
    api_base: Url,
    client: Arc<Client>,
}

impl fmt::Debug for TmdbSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbSource")
            .field("api_key", &redacted(&self.api_key))
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl TmdbSource {
    pub fn new(settings: &TmdbSettings) -> Result<Self, ProviderError> {
        Self::with_client(settings, Client::new())
    }

    pub fn with_client(
        settings: &TmdbSettings,
        client: Client,
    ) -> Result<Self, ProviderError> {
        let api_base = Url::parse(&settings.api_base).map_err(|e| {
            ProviderError::ParseError(format!(
                "invalid TMDB api base {}: {e}",
                settings.api_base
            ))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ProviderError::ParseError(format!(
                "TMDB api base cannot carry paths: {}",
                settings.api_base
            )));
        }

        Ok(Self {
            api_key: settings.api_key.clone(),
            api_base,
            client: Arc::new(client),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // Checked in the constructor.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET an endpoint and decode the body. `Ok(None)` on 404.
    ///
    /// Transport errors are stripped of their URL, which carries the key.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, ProviderError> {
        tracing::debug!(path = url.path(), "TMDB request");

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED => {
                return Err(ProviderError::InvalidApiKey);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited);
            }
            status if !status.is_success() => {
                return Err(ProviderError::ApiError(format!(
                    "TMDB API returned status: {status}"
                )));
            }
            _ => {}
        }

        let body = response.bytes().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn search_people(
        &self,
        name: &str,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let url = self.endpoint(&["search", "person"]);
        let response: SearchResponse = self
            .get_json(url, &[("query", name)])
            .await?
            .unwrap_or_default();

        tracing::info!(
            query = name,
            results = response.results.len(),
            "TMDB person search"
        );

        Ok(response
            .results
            .into_iter()
            .filter_map(|item| {
                let remote_id = RemoteId::from_signed(item.id)?;
                Some(SearchHit {
                    remote_id,
                    display_name: item.name.unwrap_or_default(),
                    thumbnail_path: item.profile_path,
                })
            })
            .collect())
    }

    async fn get_person(
        &self,
        id: RemoteId,
        language: Option<&str>,
    ) -> Result<Option<PersonRecord>, ProviderError> {
        let id = id.to_string();
        let url = self.endpoint(&["person", &id]);
        let mut params = vec![("append_to_response", PERSON_APPEND)];
        if let Some(language) = language {
            params.push(("language", language));
        }
        self.get_json(url, &params).await
    }

    async fn get_season(
        &self,
        series_id: RemoteId,
        season_number: u32,
        language: Option<&str>,
        image_languages: Option<&str>,
    ) -> Result<Option<SeasonRecord>, ProviderError> {
        let series_id = series_id.to_string();
        let season_number = season_number.to_string();
        let url = self.endpoint(&["tv", &series_id, "season", &season_number]);
        let mut params = vec![("append_to_response", SEASON_APPEND)];
        if let Some(language) = language {
            params.push(("language", language));
        }
        if let Some(image_languages) = image_languages {
            params.push(("include_image_language", image_languages));
        }
        self.get_json(url, &params).await
    }
}

#[async_trait]
impl MetadataSource for TmdbSource {
    async fn search(
        &self,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        match query.kind {
            RecordKind::Person => self.search_people(&query.name).await,
            // TMDB has no season search endpoint.
            RecordKind::Season => Ok(Vec::new()),
        }
    }

    async fn fetch(
        &self,
        request: FetchRequest,
    ) -> Result<Option<RemoteRecord>, ProviderError> {
        let language = request.language.as_deref();
        match request.key {
            RecordKey::Person(id) => Ok(self
                .get_person(id, language)
                .await?
                .map(RemoteRecord::Person)),
            RecordKey::Season {
                series_id,
                season_number,
            } => Ok(self
                .get_season(
                    series_id,
                    season_number,
                    language,
                    request.image_languages.as_deref(),
                )
                .await?
                .map(RemoteRecord::Season)),
        }
    }

    fn name(&self) -> &'static str {
        "TMDB"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments_to_versioned_base() {
        let source = TmdbSource::new(&TmdbSettings::default()).unwrap();
        assert_eq!(
            source.endpoint(&["tv", "1399", "season", "2"]).as_str(),
            "https://api.themoviedb.org/3/tv/1399/season/2"
        );
    }

    #[test]
    fn rejects_unusable_api_base() {
        let settings = TmdbSettings {
            api_base: "mailto:someone@example.com".to_string(),
            ..TmdbSettings::default()
        };
        assert!(matches!(
            TmdbSource::new(&settings),
            Err(ProviderError::ParseError(_))
        ));
    }

    #[test]
    fn debug_output_never_contains_the_key() {
        let settings = TmdbSettings {
            api_key: "super-secret".to_string(),
            ..TmdbSettings::default()
        };
        let source = TmdbSource::new(&settings).unwrap();
        assert!(!format!("{settings:?}").contains("super-secret"));
        assert!(!format!("{source:?}").contains("super-secret"));
    }
}
