use std::collections::BTreeMap;
use std::fmt;

use crate::request::RecordKind;

const TMDB_SITE: &str = "https://www.themoviedb.org";
const IMDB_SITE: &str = "https://www.imdb.com";
const TVDB_SITE: &str = "https://thetvdb.com";

/// External catalogues an entity can be cross-referenced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProviderKey {
    /// TMDB id of the entity itself.
    Tmdb,
    /// TMDB id of the series a season belongs to.
    TmdbSeries,
    Imdb,
    Tvdb,
}

impl ProviderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKey::Tmdb => "Tmdb",
            ProviderKey::TmdbSeries => "TmdbSeries",
            ProviderKey::Imdb => "Imdb",
            ProviderKey::Tvdb => "Tvdb",
        }
    }

    /// Public web page for an id under this key on an entity of `kind`.
    ///
    /// TMDB season pages are addressed by series and season number, so a
    /// season's own TMDB id has no page of its own.
    pub fn url_for(&self, kind: RecordKind, id: &str) -> Option<String> {
        match (self, kind) {
            (ProviderKey::Tmdb, RecordKind::Person) => {
                Some(format!("{TMDB_SITE}/person/{id}"))
            }
            (ProviderKey::Tmdb, RecordKind::Season) => None,
            (ProviderKey::TmdbSeries, _) => Some(format!("{TMDB_SITE}/tv/{id}")),
            (ProviderKey::Imdb, RecordKind::Person) => {
                Some(format!("{IMDB_SITE}/name/{id}"))
            }
            (ProviderKey::Imdb, RecordKind::Season) => {
                Some(format!("{IMDB_SITE}/title/{id}"))
            }
            (ProviderKey::Tvdb, RecordKind::Season) => {
                Some(format!("{TVDB_SITE}/?tab=season&id={id}"))
            }
            (ProviderKey::Tvdb, RecordKind::Person) => None,
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map of external identifiers attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProviderIds(BTreeMap<ProviderKey, String>);

impl ProviderIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: ProviderKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Records `value` only when it is non-empty after trimming.
    pub fn set_if_present(&mut self, key: ProviderKey, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: ProviderKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ProviderKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderKey, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Public pages for every id that has one, in key order.
    pub fn urls(&self, kind: RecordKind) -> Vec<(ProviderKey, String)> {
        self.iter()
            .filter_map(|(key, id)| Some((key, key.url_for(kind, id)?)))
            .collect()
    }
}
