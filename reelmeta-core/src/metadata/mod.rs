//! Resolution and mapping logic between a [`MetadataSource`] and the
//! caller's domain entities.
//!
//! [`MetadataSource`]: crate::providers::MetadataSource

pub mod locale;
pub mod mapper;
pub mod ranking;
pub mod resolver;
pub mod roles;

pub use locale::{LocaleMatch, adjust_image_language, image_language_param, match_locale};
pub use mapper::{RecordMapper, parse_remote_date};
pub use ranking::rank_images;
pub use resolver::{IdentifierResolver, Resolution};
pub use roles::{CreditsPolicy, RoleClassifier};
