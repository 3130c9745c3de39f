use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reelmeta_core::metadata::{CreditsPolicy, RecordMapper, RoleClassifier};
use reelmeta_core::providers::records::PersonRecord;
use reelmeta_core::providers::{
    FetchRequest, ImageUrlBuilder, MetadataSource, ProviderError, RecordKey,
    RemoteRecord, SearchHit, SearchQuery, TmdbImageSize,
};
use reelmeta_core::{Enrichment, MetadataError, MetadataPipeline};
use reelmeta_model::{LookupRequest, ProviderKey, RecordKind, RemoteId};
use tokio_util::sync::CancellationToken;

/// In-memory source serving a fixed set of people.
#[derive(Default)]
struct FakeSource {
    people: Vec<PersonRecord>,
    searches: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeSource {
    fn with_person(json: serde_json::Value) -> Self {
        Self {
            people: vec![serde_json::from_value(json).unwrap()],
            ..Self::default()
        }
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn search(
        &self,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if query.kind != RecordKind::Person {
            return Ok(Vec::new());
        }
        Ok(self
            .people
            .iter()
            .filter(|p| p.name.as_deref() == Some(query.name.as_str()))
            .filter_map(|p| {
                Some(SearchHit {
                    remote_id: RemoteId::from_signed(p.id)?,
                    display_name: p.name.clone().unwrap_or_default(),
                    thumbnail_path: None,
                })
            })
            .collect())
    }

    async fn fetch(
        &self,
        request: FetchRequest,
    ) -> Result<Option<RemoteRecord>, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let RecordKey::Person(id) = request.key else {
            return Ok(None);
        };
        Ok(self
            .people
            .iter()
            .find(|p| p.id == id.get() as i64)
            .cloned()
            .map(RemoteRecord::Person))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Never answers; used to observe cancellation of in-flight calls.
struct StalledSource;

#[async_trait]
impl MetadataSource for StalledSource {
    async fn search(
        &self,
        _query: SearchQuery,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        std::future::pending().await
    }

    async fn fetch(
        &self,
        _request: FetchRequest,
    ) -> Result<Option<RemoteRecord>, ProviderError> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}

fn jane_doe() -> serde_json::Value {
    serde_json::json!({
        "id": 500,
        "name": "Jane Doe",
        "biography": "French actor.",
        "birthday": "1980-06-15",
        "place_of_birth": "",
        "imdb_id": "nm0000500",
        "images": {"profiles": [
            {"file_path": "/en.jpg", "width": 400, "height": 600, "iso_639_1": "en"},
            {"file_path": "/fr.jpg", "width": 400, "height": 600, "iso_639_1": "fr"},
            {"file_path": "/none.jpg", "width": 400, "height": 600, "iso_639_1": null}
        ]}
    })
}

fn mapper() -> RecordMapper {
    RecordMapper::new(
        Arc::new(RoleClassifier::new(&CreditsPolicy::default())),
        ImageUrlBuilder::new(
            "https://img.example/t/p",
            TmdbImageSize::W500,
            TmdbImageSize::H632,
        ),
    )
}

#[tokio::test]
async fn jane_doe_is_enriched_with_ranked_images() {
    let source = Arc::new(FakeSource::with_person(jane_doe()));
    let pipeline = MetadataPipeline::new(source.clone(), mapper());

    let request = LookupRequest::new("Jane Doe")
        .with_remote_id(500)
        .automated(false)
        .with_locale("fr");
    let person = match pipeline
        .resolve_and_map_person(&request, &CancellationToken::new())
        .await
        .unwrap()
    {
        Enrichment::Found(person) => person,
        other => panic!("expected a person, got {other:?}"),
    };

    let tags: Vec<_> = person
        .images
        .iter()
        .map(|image| image.locale_tag.as_deref())
        .collect();
    assert_eq!(tags, [Some("fr"), None, Some("en")]);
    assert_eq!(
        person.primary_image_url.as_deref(),
        Some("https://img.example/t/p/h632/fr.jpg")
    );

    assert_eq!(person.name, "Jane Doe");
    assert_eq!(person.provider_ids.get(ProviderKey::Tmdb), Some("500"));
    assert_eq!(person.provider_ids.get(ProviderKey::Imdb), Some("nm0000500"));
    assert_eq!(person.production_locations, None);
    assert_eq!(person.overview.as_deref(), Some("French actor."));

    assert_eq!(source.searches.load(Ordering::SeqCst), 0);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interactive_lookup_resolves_by_name() {
    let source = Arc::new(FakeSource::with_person(jane_doe()));
    let pipeline = MetadataPipeline::new(source.clone(), mapper());

    let outcome = pipeline
        .resolve_and_map_person(&LookupRequest::new("Jane Doe"), &CancellationToken::new())
        .await
        .unwrap();

    let person = outcome.found().unwrap();
    assert_eq!(person.provider_ids.get(ProviderKey::Tmdb), Some("500"));
    assert_eq!(source.searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_name_is_unresolved() {
    let source = Arc::new(FakeSource::with_person(jane_doe()));
    let pipeline = MetadataPipeline::new(source.clone(), mapper());

    let outcome = pipeline
        .resolve_and_map_person(&LookupRequest::new("John Roe"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, Enrichment::Unresolved);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stale_id_is_not_found() {
    let pipeline = MetadataPipeline::new(Arc::new(FakeSource::default()), mapper());

    let outcome = pipeline
        .resolve_and_map_person(
            &LookupRequest::new("Jane Doe").with_remote_id(77),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Enrichment::NotFound);
}

#[tokio::test]
async fn person_images_are_ranked_for_the_locale() {
    let pipeline = MetadataPipeline::new(
        Arc::new(FakeSource::with_person(jane_doe())),
        mapper(),
    );

    let images = pipeline
        .person_images(
            &LookupRequest::new("Jane Doe").with_remote_id(500).with_locale("en"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let urls: Vec<_> = images.iter().map(|image| image.url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://img.example/t/p/h632/en.jpg",
            "https://img.example/t/p/h632/none.jpg",
            "https://img.example/t/p/h632/fr.jpg",
        ]
    );
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_fetch() {
    let pipeline = MetadataPipeline::new(Arc::new(StalledSource), mapper());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let request = LookupRequest::new("Jane Doe").with_remote_id(500);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        pipeline.resolve_and_map_person(&request, &cancel),
    )
    .await
    .expect("cancellation should end the call");

    assert!(matches!(result, Err(MetadataError::Cancelled)));
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_search() {
    let pipeline = MetadataPipeline::new(Arc::new(StalledSource), mapper());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        pipeline.search_candidates(
            RecordKind::Person,
            &LookupRequest::new("Jane Doe"),
            &cancel,
        ),
    )
    .await
    .expect("cancellation should end the call");

    assert!(result.unwrap_err().is_cancelled());
}
