//! Wire shapes of the TMDB responses the pipeline consumes.
//!
//! TMDB omits or nulls fields freely, so everything beyond the id is
//! optional and defaulted.

use serde::{Deserialize, Serialize};

/// Explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let raw: Option<T> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub images: Option<ProfileImages>,
    #[serde(default)]
    pub external_ids: Option<ExternalIdsRecord>,
}

impl PersonRecord {
    pub fn profiles(&self) -> Option<&[ImageRecord]> {
        self.images
            .as_ref()
            .and_then(|images| images.profiles.as_deref())
    }

    /// IMDb id from the record itself, falling back to the appended
    /// external ids block.
    pub fn imdb_id(&self) -> Option<&str> {
        non_blank(self.imdb_id.as_deref()).or_else(|| {
            self.external_ids
                .as_ref()
                .and_then(|ids| non_blank(ids.imdb_id.as_deref()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub external_ids: Option<ExternalIdsRecord>,
    #[serde(default)]
    pub credits: Option<CreditsRecord>,
    #[serde(default)]
    pub images: Option<PosterImages>,
}

impl SeasonRecord {
    pub fn posters(&self) -> Option<&[ImageRecord]> {
        self.images
            .as_ref()
            .and_then(|images| images.posters.as_deref())
    }

    pub fn tvdb_id(&self) -> Option<String> {
        self.external_ids
            .as_ref()
            .and_then(|ids| ids.tvdb_id.as_ref())
            .and_then(IdValue::to_non_empty_string)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileImages {
    #[serde(default)]
    pub profiles: Option<Vec<ImageRecord>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PosterImages {
    #[serde(default)]
    pub posters: Option<Vec<ImageRecord>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalIdsRecord {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<IdValue>,
}

/// TMDB reports some cross-reference ids as numbers and others as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    pub fn to_non_empty_string(&self) -> Option<String> {
        match self {
            IdValue::Number(n) if *n > 0 => Some(n.to_string()),
            IdValue::Number(_) => None,
            IdValue::Text(s) => non_blank(Some(s.as_str())).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreditsRecord {
    #[serde(default)]
    pub cast: Option<Vec<CastRecord>>,
    #[serde(default)]
    pub crew: Option<Vec<CrewRecord>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CastRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrewRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchItem>,
    #[serde(default)]
    pub total_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
