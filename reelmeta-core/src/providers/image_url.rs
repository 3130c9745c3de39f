use serde::{Deserialize, Serialize};

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// What an image path depicts; selects the configured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Profile,
}

/// TMDB image size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TmdbImageSize {
    W45,
    W92,
    W154,
    W185,
    W300,
    W342,
    W500,
    W780,
    W1280,
    H632,
    #[default]
    Original,
}

impl TmdbImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TmdbImageSize::W45 => "w45",
            TmdbImageSize::W92 => "w92",
            TmdbImageSize::W154 => "w154",
            TmdbImageSize::W185 => "w185",
            TmdbImageSize::W300 => "w300",
            TmdbImageSize::W342 => "w342",
            TmdbImageSize::W500 => "w500",
            TmdbImageSize::W780 => "w780",
            TmdbImageSize::W1280 => "w1280",
            TmdbImageSize::H632 => "h632",
            TmdbImageSize::Original => "original",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "w45" => Some(TmdbImageSize::W45),
            "w92" => Some(TmdbImageSize::W92),
            "w154" => Some(TmdbImageSize::W154),
            "w185" => Some(TmdbImageSize::W185),
            "w300" => Some(TmdbImageSize::W300),
            "w342" => Some(TmdbImageSize::W342),
            "w500" => Some(TmdbImageSize::W500),
            "w780" => Some(TmdbImageSize::W780),
            "w1280" => Some(TmdbImageSize::W1280),
            "h632" => Some(TmdbImageSize::H632),
            "original" => Some(TmdbImageSize::Original),
            _ => None,
        }
    }
}

/// Turns TMDB file paths into absolute image URLs. No network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base: String,
    poster_size: TmdbImageSize,
    profile_size: TmdbImageSize,
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new(
            TMDB_IMAGE_BASE,
            TmdbImageSize::Original,
            TmdbImageSize::Original,
        )
    }
}

impl ImageUrlBuilder {
    pub fn new(
        base: impl Into<String>,
        poster_size: TmdbImageSize,
        profile_size: TmdbImageSize,
    ) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            poster_size,
            profile_size,
        }
    }

    pub fn build(&self, kind: ImageKind, file_path: &str) -> String {
        let size = match kind {
            ImageKind::Poster => self.poster_size,
            ImageKind::Profile => self.profile_size,
        };
        let path = file_path.trim();
        if path.starts_with('/') {
            format!("{}/{}{}", self.base, size.as_str(), path)
        } else {
            format!("{}/{}/{}", self.base, size.as_str(), path)
        }
    }

    /// Like [`build`](Self::build) but maps a missing or blank path to `None`.
    pub fn build_opt(
        &self,
        kind: ImageKind,
        file_path: Option<&str>,
    ) -> Option<String> {
        file_path
            .filter(|path| !path.trim().is_empty())
            .map(|path| self.build(kind, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_absolute_urls_per_kind() {
        let builder = ImageUrlBuilder::new(
            "https://image.tmdb.org/t/p/",
            TmdbImageSize::W500,
            TmdbImageSize::H632,
        );

        assert_eq!(
            builder.build(ImageKind::Poster, "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            builder.build(ImageKind::Profile, "xyz.png"),
            "https://image.tmdb.org/t/p/h632/xyz.png"
        );
    }

    #[test]
    fn blank_paths_produce_no_url() {
        let builder = ImageUrlBuilder::default();
        assert_eq!(builder.build_opt(ImageKind::Profile, Some("  ")), None);
        assert_eq!(builder.build_opt(ImageKind::Profile, None), None);
    }

    #[test]
    fn size_round_trips_through_its_name() {
        assert_eq!(TmdbImageSize::from_str("h632"), Some(TmdbImageSize::H632));
        assert_eq!(TmdbImageSize::from_str("w9000"), None);
    }
}
