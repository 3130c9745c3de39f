use chrono::{DateTime, Utc};

use crate::credits::{CastCredit, CrewCredit};
use crate::image::CandidateImage;
use crate::provider_ids::ProviderIds;

/// Person enriched from the remote source.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub name: String,
    pub overview: Option<String>,
    pub homepage_url: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub death_date: Option<DateTime<Utc>>,
    /// Place of birth. `None` when unknown, never an empty list.
    pub production_locations: Option<Vec<String>>,
    pub provider_ids: ProviderIds,
    pub images: Vec<CandidateImage>,
    pub primary_image_url: Option<String>,
}

/// Season of a series enriched from the remote source.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Season {
    pub name: String,
    pub index_number: u32,
    pub overview: Option<String>,
    pub premiere_date: Option<DateTime<Utc>>,
    pub production_year: Option<i32>,
    pub provider_ids: ProviderIds,
    pub cast: Vec<CastCredit>,
    pub crew: Vec<CrewCredit>,
    pub images: Vec<CandidateImage>,
    pub primary_image_url: Option<String>,
}
