/// An image offered by the remote source for an item.
///
/// `locale_tag` is `None` for images without linguistic content, e.g. a
/// textless poster.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub locale_tag: Option<String>,
    pub community_rating: Option<f64>,
    pub vote_count: Option<u32>,
}

impl CandidateImage {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_locale(mut self, tag: Option<&str>) -> Self {
        self.locale_tag = tag.map(str::to_string);
        self
    }
}
