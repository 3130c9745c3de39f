/// How well an image's language tag fits the caller's preferred locale.
///
/// Ordered so that a better match compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocaleMatch {
    /// Tagged with some other language.
    Other,
    /// No linguistic content.
    Neutral,
    /// Case-insensitive match with the preferred locale.
    Exact,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Classify `tag` against `preferred`. Blank values count as absent.
pub fn match_locale(preferred: Option<&str>, tag: Option<&str>) -> LocaleMatch {
    match (non_blank(preferred), non_blank(tag)) {
        (_, None) => LocaleMatch::Neutral,
        (Some(preferred), Some(tag)) if preferred.eq_ignore_ascii_case(tag) => {
            LocaleMatch::Exact
        }
        _ => LocaleMatch::Other,
    }
}

/// Bare language of a regional locale: `pt-BR` gives `pt`.
pub fn base_language(locale: &str) -> Option<&str> {
    locale
        .split_once(['-', '_'])
        .map(|(language, _)| language)
        .filter(|language| !language.is_empty())
}

/// Rewrite a bare-language image tag to the regional preferred locale it
/// belongs to, so `pt` images rank as exact matches for `pt-BR`.
pub fn adjust_image_language(
    tag: Option<&str>,
    preferred: Option<&str>,
) -> Option<String> {
    let tag = non_blank(tag)?;
    if let Some(preferred) = non_blank(preferred)
        && base_language(preferred)
            .is_some_and(|language| language.eq_ignore_ascii_case(tag))
    {
        return Some(preferred.to_string());
    }
    Some(tag.to_string())
}

/// Value of TMDB's `include_image_language` query parameter.
///
/// Preferred locale, its bare language, textless (`null`), then English.
pub fn image_language_param(preferred: Option<&str>) -> String {
    let mut languages: Vec<&str> = Vec::with_capacity(4);
    if let Some(preferred) = non_blank(preferred) {
        languages.push(preferred);
        if let Some(language) = base_language(preferred) {
            languages.push(language);
        }
    }
    languages.push("null");
    if !languages.iter().any(|l| l.eq_ignore_ascii_case("en")) {
        languages.push("en");
    }
    languages.join(",")
}
