use std::cmp::Reverse;

use reelmeta_model::CandidateImage;

use super::locale::match_locale;

/// Order images by how well their language fits `preferred`.
///
/// Exact matches come first, then textless images, then everything else.
/// The sort is stable so the source's own order survives inside each
/// class, and no image is ever dropped.
pub fn rank_images(
    mut images: Vec<CandidateImage>,
    preferred: Option<&str>,
) -> Vec<CandidateImage> {
    images.sort_by_key(|image| {
        Reverse(match_locale(preferred, image.locale_tag.as_deref()))
    });
    images
}
