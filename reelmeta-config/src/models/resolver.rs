use anyhow::{Context, anyhow};
use reelmeta_core::MetadataPipeline;
use reelmeta_core::metadata::CreditsPolicy;
use reelmeta_core::providers::{TmdbImageSize, TmdbSettings};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::util::{parse_bool_var, parse_csv};

/// Source that produced the resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Everything needed to build a [`MetadataPipeline`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// TMDB connection and image sizing. The API key is normally supplied
    /// through `TMDB_API_KEY` rather than a file.
    pub tmdb: TmdbSettings,
    /// Cast limit, crew allow-list and extra job title mappings.
    pub credits: CreditsPolicy,
}

impl ResolverConfig {
    /// Load configuration from the process environment.
    /// Evaluation order:
    /// 1) `.env` in the working directory, unless `REELMETA_LOAD_DOTENV=false`,
    /// 2) `$REELMETA_CONFIG_PATH` (TOML or JSON file),
    /// 3) `$REELMETA_CONFIG_JSON` (inline JSON),
    /// 4) `reelmeta.toml` and friends in the working directory,
    /// 5) defaults.
    ///
    /// Individual env overrides are applied on top of whichever source won.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        if parse_bool_var("REELMETA_LOAD_DOTENV").unwrap_or(true) {
            match dotenvy::dotenv() {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), "loaded .env");
                }
                Err(err) if err.not_found() => {}
                Err(err) => return Err(err).context("failed to read .env"),
            }
        }

        Self::load_with(|name| env::var(name).ok())
    }

    /// Same as [`load_from_env`](Self::load_from_env) without the `.env`
    /// step, reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (mut config, source) =
            if let Some(path_str) = non_blank("REELMETA_CONFIG_PATH") {
                let path = PathBuf::from(path_str);
                let config = Self::load_from_file(&path)?;
                (config, ConfigSource::EnvPath(path))
            } else if let Some(raw) = non_blank("REELMETA_CONFIG_JSON") {
                let parsed = Self::parse_json(&raw)
                    .context("failed to parse REELMETA_CONFIG_JSON")?;
                (parsed, ConfigSource::EnvInline)
            } else if let Some(path) = Self::find_default_file() {
                let config = Self::load_from_file(&path)?;
                (config, ConfigSource::File(path))
            } else {
                (Self::default(), ConfigSource::Default)
            };

        config.apply_overrides(&non_blank)?;

        if config.tmdb.api_key.trim().is_empty() {
            tracing::warn!("no TMDB api key configured; remote calls will fail");
        }
        tracing::debug!(?source, "resolver configuration loaded");

        Ok((config, source))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read resolver config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid resolver config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid resolver config {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse resolver config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid resolver config json: {err}"))
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "reelmeta.toml",
            "reelmeta.json",
            "config/reelmeta.toml",
            "config/reelmeta.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn apply_overrides<F>(&mut self, var: &F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("TMDB_API_KEY") {
            self.tmdb.api_key = key.trim().to_string();
        }
        if let Some(base) = var("TMDB_API_BASE") {
            self.tmdb.api_base = base.trim().to_string();
        }
        if let Some(base) = var("TMDB_IMAGE_BASE") {
            self.tmdb.image_base = base.trim().to_string();
        }
        if let Some(size) = var("REELMETA_POSTER_SIZE") {
            self.tmdb.poster_size = parse_size("REELMETA_POSTER_SIZE", &size)?;
        }
        if let Some(size) = var("REELMETA_PROFILE_SIZE") {
            self.tmdb.profile_size = parse_size("REELMETA_PROFILE_SIZE", &size)?;
        }
        if let Some(language) = var("REELMETA_DEFAULT_LANGUAGE") {
            self.tmdb.default_language = language.trim().to_string();
        }
        if let Some(raw) = var("REELMETA_MAX_CAST") {
            self.credits.max_cast = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid REELMETA_MAX_CAST: {raw}"))?;
        }
        if let Some(raw) = var("REELMETA_WANTED_CREW") {
            self.credits.wanted = parse_csv(&raw);
        }
        Ok(())
    }

    /// Build a TMDB-backed pipeline from this configuration.
    pub fn build_pipeline(&self) -> anyhow::Result<MetadataPipeline> {
        if self.tmdb.api_key.trim().is_empty() {
            return Err(anyhow!(
                "TMDB api key missing; set TMDB_API_KEY or tmdb.api_key"
            ));
        }
        MetadataPipeline::tmdb(&self.tmdb, &self.credits)
            .context("failed to construct TMDB pipeline")
    }
}

fn parse_size(name: &str, raw: &str) -> anyhow::Result<TmdbImageSize> {
    TmdbImageSize::from_str(raw.trim().to_ascii_lowercase().as_str())
        .ok_or_else(|| anyhow!("invalid {name}: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelmeta_model::RoleCategory;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_tmdb() {
        let config = ResolverConfig::default();
        assert_eq!(config.tmdb.api_base, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.image_base, "https://image.tmdb.org/t/p");
        assert_eq!(config.tmdb.default_language, "en");
        assert_eq!(config.credits.max_cast, 15);
        assert_eq!(config.credits.wanted, ["Director", "Writer", "Producer"]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ResolverConfig::parse_from_str(
            r#"
            [tmdb]
            poster_size = "w500"

            [credits]
            max_cast = 5

            [credits.job_titles]
            "showrunner" = "Producer"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.tmdb.poster_size, TmdbImageSize::W500);
        assert_eq!(config.tmdb.profile_size, TmdbImageSize::Original);
        assert_eq!(config.credits.max_cast, 5);
        assert_eq!(config.credits.wanted.len(), 3);
        assert_eq!(
            config.credits.job_titles.get("showrunner"),
            Some(&RoleCategory::Producer)
        );
    }

    #[test]
    fn parse_from_str_falls_back_to_json() {
        let config = ResolverConfig::parse_from_str(
            r#"{"credits": {"wanted": ["Editor"]}}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.credits.wanted, ["Editor"]);
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = ResolverConfig::parse_from_str("{{ nope", "inline")
            .unwrap_err()
            .to_string();
        assert!(err.contains("toml error"));
        assert!(err.contains("json error"));
    }

    #[test]
    fn inline_json_then_overrides() {
        let (config, source) = ResolverConfig::load_with(vars(&[
            ("REELMETA_CONFIG_JSON", r#"{"credits": {"max_cast": 4}}"#),
            ("TMDB_API_KEY", " abc123 "),
            ("REELMETA_WANTED_CREW", "Director, Cinematographer"),
            ("REELMETA_PROFILE_SIZE", "H632"),
        ]))
        .unwrap();

        assert_eq!(source, ConfigSource::EnvInline);
        assert_eq!(config.credits.max_cast, 4);
        assert_eq!(config.tmdb.api_key, "abc123");
        assert_eq!(config.credits.wanted, ["Director", "Cinematographer"]);
        assert_eq!(config.tmdb.profile_size, TmdbImageSize::H632);
    }

    #[test]
    fn invalid_override_is_an_error() {
        let err = ResolverConfig::load_with(vars(&[("REELMETA_MAX_CAST", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("REELMETA_MAX_CAST"));

        assert!(
            ResolverConfig::load_with(vars(&[("REELMETA_POSTER_SIZE", "w9")]))
                .is_err()
        );
    }

    #[test]
    fn pipeline_requires_api_key() {
        assert!(ResolverConfig::default().build_pipeline().is_err());

        let mut config = ResolverConfig::default();
        config.tmdb.api_key = "abc".to_string();
        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(pipeline.source_name(), "TMDB");
    }
}
