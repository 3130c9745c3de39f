//! Data model shared between the reelmeta pipeline and its callers.
//!
//! Everything in here is plain data. The host owns and persists the
//! entities; the pipeline only builds a transient instance per call.
#![allow(missing_docs)]

pub mod credits;
pub mod entities;
pub mod ids;
pub mod image;
pub mod provider_ids;
pub mod request;
pub mod search;

pub use credits::{CastCredit, CastMember, CrewCredit, CrewMember, RoleCategory};
pub use entities::{Person, Season};
pub use ids::RemoteId;
pub use image::CandidateImage;
pub use provider_ids::{ProviderIds, ProviderKey};
pub use request::{LookupRequest, RecordKind};
pub use search::RemoteSearchResult;
