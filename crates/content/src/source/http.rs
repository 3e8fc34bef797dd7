use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use super::ContentSource;
use crate::error::ContentError;

/// Fetches content files over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// Creates a source rooted at `base`. A trailing slash is added if missing
    /// so relative paths resolve under it.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Url` if `base` is not a valid URL.
    pub fn new(base: &str) -> Result<Self, ContentError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a content path.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Url` if the path cannot be joined.
    pub fn url_for(&self, path: &str) -> Result<Url, ContentError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let url = self.url_for(path)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ContentError::HttpStatus {
                path: path.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}
