use std::sync::Arc;

use reqwest::Client;
use url::Url;

use super::ProviderError;

/// Forwards image URLs to a plain HTTP client and hands back the raw
/// response. Status codes are not interpreted here.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: Arc<Client>,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub async fn fetch(
        &self,
        url: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = Url::parse(url).map_err(|e| {
            ProviderError::ParseError(format!("invalid image url {url}: {e}"))
        })?;

        tracing::debug!(%url, "forwarding image request");
        Ok(self.client.get(url).send().await?)
    }
}
