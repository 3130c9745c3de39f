pub mod image_url;
pub mod passthrough;
pub mod records;
pub mod tmdb;
pub mod traits;

pub use image_url::{ImageKind, ImageUrlBuilder, TmdbImageSize};
pub use passthrough::HttpImageFetcher;
pub use tmdb::{TmdbSettings, TmdbSource};
pub use traits::{
    FetchRequest, MetadataSource, ProviderError, RecordKey, RemoteRecord,
    SearchHit, SearchQuery,
};

#[cfg(test)]
pub use traits::MockMetadataSource;
