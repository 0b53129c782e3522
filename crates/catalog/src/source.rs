//! Where catalog bodies come from

use arcade_errors::Error;
use arcade_events::EventSender;
use arcade_net::NetClient;
use async_trait::async_trait;

/// Produces the raw catalog body
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog; any error makes the catalog unavailable
    async fn fetch(&self) -> Result<String, Error>;
}

/// Catalog served over HTTP as a JSON array
pub struct HttpCatalogSource {
    client: NetClient,
    url: String,
    tx: EventSender,
}

impl HttpCatalogSource {
    #[must_use]
    pub fn new(client: NetClient, url: impl Into<String>, tx: EventSender) -> Self {
        Self {
            client,
            url: url.into(),
            tx,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<String, Error> {
        arcade_net::fetch_text(&self.client, &self.url, &self.tx).await
    }
}
