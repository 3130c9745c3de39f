//! Caller-facing operations.
//!
//! Every operation is a short sequential chain of remote calls: resolve,
//! fetch, map. Each remote call is raced against the caller's
//! [`CancellationToken`], so a cancelled token aborts the in-flight
//! request and surfaces [`MetadataError::Cancelled`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reelmeta_model::{
    CandidateImage, LookupRequest, Person, RecordKind, RemoteId,
    RemoteSearchResult, Season,
};
use tokio_util::sync::CancellationToken;

use crate::error::{MetadataError, Result};
use crate::metadata::{
    CreditsPolicy, IdentifierResolver, RecordMapper, Resolution, RoleClassifier,
    image_language_param, rank_images,
};
use crate::providers::records::{PersonRecord, SeasonRecord};
use crate::providers::{
    FetchRequest, HttpImageFetcher, MetadataSource, ProviderError, RecordKey,
    RemoteRecord, SearchQuery, TmdbSettings, TmdbSource,
};

/// Result of a resolve-and-map operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment<T> {
    Found(T),
    /// No remote id could be determined.
    Unresolved,
    /// The resolved id has no remote record; the caller should drop it.
    NotFound,
}

impl<T> Enrichment<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Enrichment::Found(value) => Some(value),
            Enrichment::Unresolved | Enrichment::NotFound => None,
        }
    }
}

/// Runs `fut` unless `cancel` fires first.
async fn guarded<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, ProviderError>>,
{
    if cancel.is_cancelled() {
        return Err(MetadataError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MetadataError::Cancelled),
        result = fut => result.map_err(MetadataError::from),
    }
}

fn unexpected(expected: RecordKind, record: &RemoteRecord) -> MetadataError {
    MetadataError::Transport(ProviderError::ParseError(format!(
        "expected {expected} record, got {}",
        record.kind()
    )))
}

/// Entry point for hosts: resolves ids, fetches records and maps them.
///
/// Holds no mutable state; clone it or share it behind an `Arc`.
#[derive(Clone)]
pub struct MetadataPipeline {
    source: Arc<dyn MetadataSource>,
    resolver: IdentifierResolver,
    mapper: RecordMapper,
    images: HttpImageFetcher,
}

impl fmt::Debug for MetadataPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataPipeline")
            .field("source", &self.source.name())
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

impl MetadataPipeline {
    pub fn new(source: Arc<dyn MetadataSource>, mapper: RecordMapper) -> Self {
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&source)),
            source,
            mapper,
            images: HttpImageFetcher::new(),
        }
    }

    /// Pipeline over the TMDB REST source.
    pub fn tmdb(
        settings: &TmdbSettings,
        credits: &CreditsPolicy,
    ) -> std::result::Result<Self, ProviderError> {
        let source = TmdbSource::new(settings)?;
        let mapper = RecordMapper::new(
            Arc::new(RoleClassifier::new(credits)),
            settings.image_urls(),
        );
        Ok(Self::new(Arc::new(source), mapper))
    }

    pub fn with_image_fetcher(mut self, images: HttpImageFetcher) -> Self {
        self.images = images;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn mapper(&self) -> &RecordMapper {
        &self.mapper
    }

    pub async fn resolve_and_map_person(
        &self,
        request: &LookupRequest,
        cancel: &CancellationToken,
    ) -> Result<Enrichment<Person>> {
        let resolution = guarded(
            cancel,
            self.resolver.resolve(RecordKind::Person, request),
        )
        .await?;
        let id = match resolution {
            Resolution::Resolved(id) => id,
            Resolution::Unresolved => return Ok(Enrichment::Unresolved),
        };

        match self.fetch_person(id, request.locale(), cancel).await? {
            Some(record) => {
                let person = self.mapper.map_person(record, request, id);
                tracing::info!(
                    %id,
                    name = %person.name,
                    images = person.images.len(),
                    "person enriched"
                );
                Ok(Enrichment::Found(person))
            }
            None => {
                tracing::warn!(
                    %id,
                    name = %request.display_name,
                    "person no longer exists remotely"
                );
                Ok(Enrichment::NotFound)
            }
        }
    }

    /// `request` describes the season; its remote id is the parent
    /// series id.
    pub async fn resolve_and_map_season(
        &self,
        request: &LookupRequest,
        season_number: u32,
        cancel: &CancellationToken,
    ) -> Result<Enrichment<Season>> {
        let resolution = guarded(
            cancel,
            self.resolver.resolve(RecordKind::Season, request),
        )
        .await?;
        let series_id = match resolution {
            Resolution::Resolved(id) => id,
            Resolution::Unresolved => return Ok(Enrichment::Unresolved),
        };

        match self
            .fetch_season(series_id, season_number, request.locale(), cancel)
            .await?
        {
            Some(record) => {
                let season = self.mapper.map_season(
                    record,
                    request,
                    series_id,
                    season_number,
                );
                tracing::info!(
                    %series_id,
                    season_number,
                    cast = season.cast.len(),
                    crew = season.crew.len(),
                    "season enriched"
                );
                Ok(Enrichment::Found(season))
            }
            None => {
                tracing::warn!(%series_id, season_number, "season not found remotely");
                Ok(Enrichment::NotFound)
            }
        }
    }

    /// Rank images for display. Pure; no remote calls.
    pub fn rank_images(
        &self,
        images: Vec<CandidateImage>,
        locale: &str,
    ) -> Vec<CandidateImage> {
        let locale = locale.trim();
        rank_images(images, (!locale.is_empty()).then_some(locale))
    }

    /// Preview records for disambiguation.
    ///
    /// A known id short-circuits to a single preview of that record.
    /// Automated requests without an id get nothing, matching
    /// [`IdentifierResolver`].
    pub async fn search_candidates(
        &self,
        kind: RecordKind,
        request: &LookupRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteSearchResult>> {
        if kind == RecordKind::Season {
            return Ok(Vec::new());
        }

        if let Some(id) = request.known_remote_id() {
            let record =
                self.fetch_person(id, request.locale(), cancel).await?;
            if let Some(record) = record {
                let preview = self.mapper.person_preview(&record, request, id);
                return Ok(vec![preview]);
            }
            tracing::debug!(%id, "known id not found, falling back to search");
        }

        if request.is_automated {
            return Ok(Vec::new());
        }

        let name = request.display_name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let query = SearchQuery::new(kind, name);
        let hits = guarded(cancel, self.source.search(query)).await?;
        tracing::debug!(query = name, results = hits.len(), "search candidates");

        Ok(hits
            .into_iter()
            .map(|hit| self.mapper.hit_preview(hit))
            .collect())
    }

    /// Ranked profile images for a person with a known id. Never searches.
    pub async fn person_images(
        &self,
        request: &LookupRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<CandidateImage>> {
        let Some(id) = request.known_remote_id() else {
            return Ok(Vec::new());
        };

        let locale = request.locale();
        Ok(self
            .fetch_person(id, locale, cancel)
            .await?
            .map(|record| self.mapper.person_images(&record, locale))
            .unwrap_or_default())
    }

    /// Ranked posters for a season; `request` carries the series id.
    pub async fn season_images(
        &self,
        request: &LookupRequest,
        season_number: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<CandidateImage>> {
        let Some(series_id) = request.known_remote_id() else {
            return Ok(Vec::new());
        };

        let locale = request.locale();
        Ok(self
            .fetch_season(series_id, season_number, locale, cancel)
            .await?
            .map(|record| self.mapper.season_images(&record, locale))
            .unwrap_or_default())
    }

    /// Forward an image URL to the HTTP client and return the raw response.
    pub async fn fetch_image(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response> {
        guarded(cancel, self.images.fetch(url)).await
    }

    async fn fetch_person(
        &self,
        id: RemoteId,
        locale: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<PersonRecord>> {
        let request =
            FetchRequest::new(RecordKey::Person(id)).with_language(locale);
        match guarded(cancel, self.source.fetch(request)).await? {
            Some(RemoteRecord::Person(record)) => Ok(Some(record)),
            Some(other) => Err(unexpected(RecordKind::Person, &other)),
            None => Ok(None),
        }
    }

    async fn fetch_season(
        &self,
        series_id: RemoteId,
        season_number: u32,
        locale: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SeasonRecord>> {
        let request = FetchRequest::new(RecordKey::Season {
            series_id,
            season_number,
        })
        .with_language(locale)
        .with_image_languages(Some(image_language_param(locale)));

        match guarded(cancel, self.source.fetch(request)).await? {
            Some(RemoteRecord::Season(record)) => Ok(Some(record)),
            Some(other) => Err(unexpected(RecordKind::Season, &other)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockMetadataSource, SearchHit};

    fn pipeline(source: MockMetadataSource) -> MetadataPipeline {
        MetadataPipeline::new(Arc::new(source), RecordMapper::default())
    }

    fn person_record(id: i64, name: &str) -> RemoteRecord {
        RemoteRecord::Person(PersonRecord {
            id,
            name: Some(name.to_string()),
            ..PersonRecord::default()
        })
    }

    #[tokio::test]
    async fn unresolved_person_fetches_nothing() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source.expect_fetch().never();

        let request = LookupRequest::new("Jane Doe").automated(true);
        let outcome = pipeline(source)
            .resolve_and_map_person(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, Enrichment::Unresolved);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let mut source = MockMetadataSource::new();
        source.expect_fetch().times(1).returning(|_| Ok(None));

        let request = LookupRequest::new("Jane Doe").with_remote_id(500);
        let outcome = pipeline(source)
            .resolve_and_map_person(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, Enrichment::NotFound);
    }

    #[tokio::test]
    async fn transport_failures_are_not_cancellations() {
        let mut source = MockMetadataSource::new();
        source
            .expect_fetch()
            .returning(|_| Err(ProviderError::ApiError("boom".to_string())));

        let request = LookupRequest::new("Jane Doe").with_remote_id(500);
        let err = pipeline(source)
            .resolve_and_map_person(&request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, MetadataError::Transport(ProviderError::ApiError(_))));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let mut source = MockMetadataSource::new();
        source.expect_fetch().never();
        source.expect_search().never();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let request = LookupRequest::new("Jane Doe").with_remote_id(500);
        let pipeline = pipeline(source);

        let err = pipeline
            .resolve_and_map_person(&request, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());

        let err = pipeline
            .search_candidates(RecordKind::Person, &LookupRequest::new("Jane"), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn mismatched_record_kind_is_a_transport_error() {
        let mut source = MockMetadataSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(Some(RemoteRecord::Season(SeasonRecord::default()))));

        let request = LookupRequest::new("Jane Doe").with_remote_id(500);
        let err = pipeline(source)
            .resolve_and_map_person(&request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, MetadataError::Transport(ProviderError::ParseError(_))));
    }

    #[tokio::test]
    async fn season_fetch_sends_series_key_and_image_languages() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source
            .expect_fetch()
            .withf(|request| {
                request.key
                    == RecordKey::Season {
                        series_id: RemoteId::new(1399).unwrap(),
                        season_number: 2,
                    }
                    && request.language.as_deref() == Some("pt-BR")
                    && request.image_languages.as_deref() == Some("pt-BR,pt,null,en")
            })
            .times(1)
            .returning(|_| Ok(Some(RemoteRecord::Season(SeasonRecord::default()))));

        let request = LookupRequest::new("Season 2")
            .with_remote_id(1399)
            .with_locale("pt-BR");
        let season = pipeline(source)
            .resolve_and_map_season(&request, 2, &CancellationToken::new())
            .await
            .unwrap()
            .found()
            .unwrap();

        assert_eq!(season.index_number, 2);
        assert_eq!(season.name, "Season 2");
    }

    #[tokio::test]
    async fn season_without_series_id_is_unresolved() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source.expect_fetch().never();

        let outcome = pipeline(source)
            .resolve_and_map_season(&LookupRequest::new("Season 1"), 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, Enrichment::Unresolved);
    }

    #[tokio::test]
    async fn candidates_for_known_id_are_a_single_preview() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(Some(person_record(31, "Tom Hanks"))));

        let request = LookupRequest::new("Tom").with_remote_id(31).automated(true);
        let results = pipeline(source)
            .search_candidates(RecordKind::Person, &request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Tom Hanks");
        assert_eq!(results[0].remote_id.get(), 31);
    }

    #[tokio::test]
    async fn stale_id_falls_back_to_search_for_interactive_requests() {
        let mut source = MockMetadataSource::new();
        source.expect_fetch().times(1).returning(|_| Ok(None));
        source.expect_search().times(1).returning(|_| {
            Ok(vec![SearchHit {
                remote_id: RemoteId::new(31).unwrap(),
                display_name: "Tom Hanks".to_string(),
                thumbnail_path: None,
            }])
        });

        let request = LookupRequest::new("Tom Hanks").with_remote_id(99);
        let results = pipeline(source)
            .search_candidates(RecordKind::Person, &request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].remote_id.get(), 31);
    }

    #[tokio::test]
    async fn automated_candidates_without_id_never_search() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source.expect_fetch().never();

        let results = pipeline(source)
            .search_candidates(
                RecordKind::Person,
                &LookupRequest::new("Tom Hanks").automated(true),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn season_candidates_are_always_empty() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source.expect_fetch().never();

        let results = pipeline(source)
            .search_candidates(
                RecordKind::Season,
                &LookupRequest::new("Season 1").with_remote_id(1399),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn person_images_require_a_known_id() {
        let mut source = MockMetadataSource::new();
        source.expect_search().never();
        source.expect_fetch().never();

        let images = pipeline(source)
            .person_images(&LookupRequest::new("Jane Doe"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn missing_image_collection_is_an_empty_success() {
        let mut source = MockMetadataSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(Some(RemoteRecord::Season(SeasonRecord::default()))));

        let images = pipeline(source)
            .season_images(
                &LookupRequest::new("Season 1").with_remote_id(1399),
                1,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(images.is_empty());
    }

    #[test]
    fn rank_images_treats_blank_locale_as_unset() {
        let pipeline = pipeline(MockMetadataSource::new());
        let images = vec![
            CandidateImage::new("en", 1, 1).with_locale(Some("en")),
            CandidateImage::new("none", 1, 1),
        ];

        let ranked = pipeline.rank_images(images, "  ");
        assert_eq!(ranked[0].url, "none");
        assert_eq!(ranked[1].url, "en");
    }
}
