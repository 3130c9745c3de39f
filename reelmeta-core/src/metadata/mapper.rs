use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use reelmeta_model::{
    CandidateImage, CastCredit, CastMember, CrewCredit, CrewMember,
    LookupRequest, Person, ProviderIds, ProviderKey, RemoteId,
    RemoteSearchResult, Season,
};

use super::locale::adjust_image_language;
use super::ranking::rank_images;
use super::roles::RoleClassifier;
use crate::providers::records::{
    CreditsRecord, ImageRecord, PersonRecord, SeasonRecord,
};
use crate::providers::{ImageKind, ImageUrlBuilder, SearchHit};

/// Parse a remote date into UTC.
///
/// Accepts plain `YYYY-MM-DD` (midnight UTC) and RFC 3339 timestamps.
/// Blank or malformed input yields `None`.
pub fn parse_remote_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value, error = %e, "ignoring unparseable date");
            None
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Builds domain entities out of fetched remote records.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    classifier: Arc<RoleClassifier>,
    urls: ImageUrlBuilder,
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(
            Arc::new(RoleClassifier::builtin().clone()),
            ImageUrlBuilder::default(),
        )
    }
}

impl RecordMapper {
    pub fn new(classifier: Arc<RoleClassifier>, urls: ImageUrlBuilder) -> Self {
        Self { classifier, urls }
    }

    pub fn classifier(&self) -> &RoleClassifier {
        &self.classifier
    }

    pub fn urls(&self) -> &ImageUrlBuilder {
        &self.urls
    }

    pub fn map_person(
        &self,
        record: PersonRecord,
        request: &LookupRequest,
        id: RemoteId,
    ) -> Person {
        let locale = request.locale();
        let images = self.person_images(&record, locale);

        let mut provider_ids = ProviderIds::new();
        provider_ids.set(ProviderKey::Tmdb, id.to_string());
        provider_ids.set_if_present(ProviderKey::Imdb, record.imdb_id());

        let production_locations = record
            .place_of_birth
            .as_deref()
            .map(str::trim)
            .filter(|place| !place.is_empty())
            .map(|place| vec![place.to_string()]);

        Person {
            name: request.display_name.clone(),
            overview: present(record.biography),
            homepage_url: present(record.homepage),
            birth_date: parse_remote_date(record.birthday.as_deref()),
            death_date: parse_remote_date(record.deathday.as_deref()),
            production_locations,
            provider_ids,
            primary_image_url: images.first().map(|image| image.url.clone()),
            images,
        }
    }

    /// `series_id` is the id the season was fetched through.
    pub fn map_season(
        &self,
        record: SeasonRecord,
        request: &LookupRequest,
        series_id: RemoteId,
        season_number: u32,
    ) -> Season {
        let locale = request.locale();
        let images = self.season_images(&record, locale);

        let mut provider_ids = ProviderIds::new();
        provider_ids.set(ProviderKey::TmdbSeries, series_id.to_string());
        if let Some(own_id) = record.id.and_then(RemoteId::from_signed) {
            provider_ids.set(ProviderKey::Tmdb, own_id.to_string());
        }
        provider_ids.set_if_present(ProviderKey::Tvdb, record.tvdb_id().as_deref());

        let premiere_date = parse_remote_date(record.air_date.as_deref());
        let (cast, crew) = self.credits(record.credits);

        let name = if request.display_name.trim().is_empty() {
            record.name.unwrap_or_default()
        } else {
            request.display_name.clone()
        };

        let primary_image_url = images
            .first()
            .map(|image| image.url.clone())
            .or_else(|| self.urls.build_opt(ImageKind::Poster, record.poster_path.as_deref()));

        Season {
            name,
            index_number: season_number,
            overview: present(record.overview),
            production_year: premiere_date.map(|date| date.year()),
            premiere_date,
            provider_ids,
            cast,
            crew,
            images,
            primary_image_url,
        }
    }

    /// Ranked profile images of a person; empty when the record has none.
    pub fn person_images(
        &self,
        record: &PersonRecord,
        locale: Option<&str>,
    ) -> Vec<CandidateImage> {
        let images = record
            .profiles()
            .unwrap_or_default()
            .iter()
            .filter(|image| !image.file_path.trim().is_empty())
            .map(|image| self.candidate(ImageKind::Profile, image, locale, false))
            .collect();
        rank_images(images, locale)
    }

    /// Ranked posters of a season, carrying their community votes.
    pub fn season_images(
        &self,
        record: &SeasonRecord,
        locale: Option<&str>,
    ) -> Vec<CandidateImage> {
        let images = record
            .posters()
            .unwrap_or_default()
            .iter()
            .filter(|image| !image.file_path.trim().is_empty())
            .map(|image| self.candidate(ImageKind::Poster, image, locale, true))
            .collect();
        rank_images(images, locale)
    }

    /// Single-entry preview for a person fetched by id.
    pub fn person_preview(
        &self,
        record: &PersonRecord,
        request: &LookupRequest,
        id: RemoteId,
    ) -> RemoteSearchResult {
        let mut provider_ids = ProviderIds::new();
        provider_ids.set(ProviderKey::Tmdb, id.to_string());
        provider_ids.set_if_present(ProviderKey::Imdb, record.imdb_id());

        let image_url = record
            .profiles()
            .and_then(|profiles| profiles.first())
            .and_then(|image| {
                self.urls.build_opt(ImageKind::Profile, Some(image.file_path.as_str()))
            });

        RemoteSearchResult {
            remote_id: id,
            name: record
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| request.display_name.clone()),
            overview: present(record.biography.clone()),
            image_url,
            provider_ids,
        }
    }

    pub fn hit_preview(&self, hit: SearchHit) -> RemoteSearchResult {
        let mut provider_ids = ProviderIds::new();
        provider_ids.set(ProviderKey::Tmdb, hit.remote_id.to_string());

        RemoteSearchResult {
            remote_id: hit.remote_id,
            name: hit.display_name,
            overview: None,
            image_url: self
                .urls
                .build_opt(ImageKind::Profile, hit.thumbnail_path.as_deref()),
            provider_ids,
        }
    }

    fn candidate(
        &self,
        kind: ImageKind,
        image: &ImageRecord,
        locale: Option<&str>,
        with_votes: bool,
    ) -> CandidateImage {
        let mut candidate =
            CandidateImage::new(self.urls.build(kind, &image.file_path), image.width, image.height);
        candidate.locale_tag = adjust_image_language(image.iso_639_1.as_deref(), locale);
        if with_votes {
            candidate.community_rating = image.vote_average;
            candidate.vote_count = image.vote_count;
        }
        candidate
    }

    fn credits(
        &self,
        credits: Option<CreditsRecord>,
    ) -> (Vec<CastCredit>, Vec<CrewCredit>) {
        let Some(credits) = credits else {
            return (Vec::new(), Vec::new());
        };

        let cast = credits
            .cast
            .unwrap_or_default()
            .into_iter()
            .map(|member| CastMember {
                name: member.name,
                character: member.character,
                order: member.order,
            })
            .collect();

        let crew = credits
            .crew
            .unwrap_or_default()
            .into_iter()
            .map(|member| CrewMember {
                name: member.name,
                job_title: member.job.unwrap_or_default(),
                department: member.department,
            })
            .collect();

        (self.classifier.build_cast(cast), self.classifier.build_crew(crew))
    }
}
