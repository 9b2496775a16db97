//! Storage backend over the Cloudflare Images API
//!
//! Pass-through adapter: each capability forwards to one client operation
//! and interprets the status code where the trait contract requires it
//! (`exists` treats 404 as "not found"; anything else non-200 is an
//! unexpected state).

use super::ImageStorage;
use crate::client::ImagesClient;
use crate::models::{ApiEnvelope, ImageRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};

pub struct CloudflareStorage {
    api: ImagesClient,
}

impl CloudflareStorage {
    pub fn new(api: ImagesClient) -> Self {
        Self { api }
    }

    /// Build the backend from environment credentials.
    pub fn from_env() -> Result<Self> {
        let credentials = crate::config::Credentials::from_env()?;
        Ok(Self::new(ImagesClient::new(credentials)?))
    }

    async fn unexpected(response: Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Error::Api { status, body }
    }
}

#[async_trait]
impl ImageStorage for CloudflareStorage {
    async fn open(&self, name: &str) -> Result<Vec<u8>> {
        let response = self.api.get(name).await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
        let response = self.api.upsert(name, content).await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        let body = response.text().await?;
        let envelope: ApiEnvelope<ImageRecord> = serde_json::from_str(&body)?;
        let record = envelope.result.ok_or_else(|| Error::Api {
            status: StatusCode::OK,
            body: "upload response carried no result".to_string(),
        })?;
        Ok(self.api.url(&record.id))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let response = self.api.delete(name).await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self.api.get(name).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn size(&self, name: &str) -> Result<u64> {
        let content = self.open(name).await?;
        Ok(content.len() as u64)
    }

    fn url(&self, name: &str) -> String {
        self.api.url(name)
    }

    fn url_variant(&self, name: &str, variant: &str) -> String {
        self.api.delivery_url(name, variant)
    }
}
