//! # reelmeta core
//!
//! Resolves remote metadata for people and TV seasons and maps it into the
//! caller's domain model ([`reelmeta_model`]).
//!
//! ## Overview
//!
//! - [`providers`]: the [`MetadataSource`](providers::MetadataSource)
//!   boundary, the TMDB REST implementation, image URL building and the
//!   image passthrough.
//! - [`metadata`]: locale matching, image ranking, crew classification,
//!   identifier resolution and record mapping.
//! - [`pipeline`]: [`MetadataPipeline`], the caller-facing operations.
//!
//! ## Example
//!
//! ```no_run
//! use reelmeta_core::metadata::CreditsPolicy;
//! use reelmeta_core::providers::TmdbSettings;
//! use reelmeta_core::{Enrichment, MetadataPipeline};
//! use reelmeta_model::LookupRequest;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn enrich() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = TmdbSettings {
//!         api_key: "key".to_string(),
//!         ..TmdbSettings::default()
//!     };
//!     let pipeline = MetadataPipeline::tmdb(&settings, &CreditsPolicy::default())?;
//!
//!     let request = LookupRequest::new("Jane Doe").with_locale("fr");
//!     if let Enrichment::Found(person) = pipeline
//!         .resolve_and_map_person(&request, &CancellationToken::new())
//!         .await?
//!     {
//!         println!("{} has {} images", person.name, person.images.len());
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod providers;

pub use error::{MetadataError, Result};
pub use pipeline::{Enrichment, MetadataPipeline};
