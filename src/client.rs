//! Cloudflare Images API client
//!
//! One HTTP request per operation, bearer-token auth, and the raw
//! [`reqwest::Response`] handed back to the caller for interpretation.
//! URL construction (`base_api`, `v2_api`, delivery URLs) is pure string
//! composition and performs no network access.

use crate::config::Credentials;
use crate::models::{ApiEnvelope, BatchToken, ImagePatch};
use crate::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};

const API_ROOT: &str = "https://api.cloudflare.com";
const DELIVERY_ROOT: &str = "https://imagedelivery.net";
const BATCH_ROOT: &str = "https://batch.imagedelivery.net";

const LIST_PER_PAGE_MIN: u32 = 10;
const LIST_PER_PAGE_MAX: u32 = 10_000;

/// Query parameters for the v2 listing endpoint.
///
/// Defaults match the API surface: 1000 items per page, newest first.
#[derive(Debug, Clone)]
pub struct ListImagesParams {
    pub per_page: u32,
    pub sort_order: String,
    pub continuation_token: Option<String>,
}

impl Default for ListImagesParams {
    fn default() -> Self {
        Self {
            per_page: 1000,
            sort_order: "desc".to_string(),
            continuation_token: None,
        }
    }
}

impl ListImagesParams {
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = sort_order.into();
        self
    }

    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.per_page < LIST_PER_PAGE_MIN || self.per_page > LIST_PER_PAGE_MAX {
            return Err(Error::Validation(format!(
                "per_page must be between {} and {}, got {}",
                LIST_PER_PAGE_MIN, LIST_PER_PAGE_MAX, self.per_page
            )));
        }
        if self.sort_order != "asc" && self.sort_order != "desc" {
            return Err(Error::Validation(format!(
                "sort_order must be \"asc\" or \"desc\", got {:?}",
                self.sort_order
            )));
        }
        Ok(())
    }
}

/// Client for the Cloudflare Images API.
///
/// Holds no mutable state; every operation is an independent
/// request/response round trip, so one client can be shared freely across
/// call sites.
#[derive(Debug)]
pub struct ImagesClient {
    client: Client,
    credentials: Credentials,
    api_root: String,
    delivery_root: String,
    batch_root: String,
}

impl ImagesClient {
    /// Build a client from validated credentials, with a dedicated
    /// connection pool honoring the configured timeout.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder().timeout(credentials.timeout).build()?;
        Ok(Self::new_with_client(credentials, client))
    }

    /// Build a client around an existing `reqwest::Client`, reusing its
    /// connection pool. The per-request timeout still comes from the
    /// credentials.
    pub fn new_with_client(credentials: Credentials, client: Client) -> Self {
        Self {
            client,
            credentials,
            api_root: API_ROOT.to_string(),
            delivery_root: DELIVERY_ROOT.to_string(),
            batch_root: BATCH_ROOT.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_api_root(mut self, api_root: String) -> Self {
        self.api_root = api_root;
        self
    }

    #[cfg(test)]
    pub fn with_batch_root(mut self, batch_root: String) -> Self {
        self.batch_root = batch_root;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_batch(&self) -> bool {
        self.credentials.is_batch
    }

    /// API endpoint for image operations. In batch mode this is the fixed
    /// batch host, ignoring account and version fields.
    pub fn base_api(&self) -> String {
        if self.credentials.is_batch {
            return self.batch_root.clone();
        }
        format!(
            "{}/client/{}/accounts/{}/images/{}",
            self.api_root,
            self.credentials.client_api_version,
            self.credentials.account_id,
            self.credentials.images_api_version
        )
    }

    /// Listing endpoint, pinned to `v2` regardless of the configured images
    /// API version.
    pub fn v2_api(&self) -> String {
        format!(
            "{}/client/{}/accounts/{}/images/v2",
            self.api_root, self.credentials.client_api_version, self.credentials.account_id
        )
    }

    /// Delivery host prefix: `<delivery-root>/<account-hash>`.
    pub fn base_delivery(&self) -> String {
        format!("{}/{}", self.delivery_root, self.credentials.account_hash)
    }

    /// Delivery URL for an image with the default `public` variant.
    pub fn url(&self, image_id: &str) -> String {
        self.delivery_url(image_id, "public")
    }

    /// Delivery URL for an image with a named variant. Pure string
    /// composition; the image is not checked for existence.
    pub fn delivery_url(&self, image_id: &str, variant: &str) -> String {
        format!("{}/{}/{}", self.base_delivery(), image_id, variant)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(
            "Authorization",
            format!("Bearer {}", self.credentials.api_token),
        )
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            tracing::error!("Failed to send request to Cloudflare Images: {}", e);
            e
        })?;
        Ok(response)
    }

    /// Fetch metadata for one image: GET `base_api()/{image_id}`.
    /// 200 with a JSON envelope when present, 404 when absent.
    pub async fn get(&self, image_id: &str) -> Result<Response> {
        let url = format!("{}/{}", self.base_api(), image_id);
        self.send(self.client.get(&url)).await
    }

    /// Delete one image: DELETE `base_api()/{image_id}`.
    pub async fn delete(&self, image_id: &str) -> Result<Response> {
        let url = format!("{}/{}", self.base_api(), image_id);
        self.send(self.client.delete(&url)).await
    }

    /// Upload image bytes: multipart POST to `base_api()` with a text field
    /// `id` and a file part `file` whose filename is the image ID.
    pub async fn post(&self, image_id: &str, image: &[u8]) -> Result<Response> {
        let form = Form::new().text("id", image_id.to_string()).part(
            "file",
            Part::bytes(image.to_vec()).file_name(image_id.to_string()),
        );
        self.send(self.client.post(self.base_api()).multipart(form))
            .await
    }

    /// Ensure a fresh upload under `image_id`: DELETE first, discarding its
    /// outcome entirely (a 404 for a missing image is expected), then POST.
    /// Not a transaction; if the upload fails after a successful delete the
    /// image is gone remotely and nothing is rolled back.
    pub async fn upsert(&self, image_id: &str, image: &[u8]) -> Result<Response> {
        let _ = self.delete(image_id).await;
        self.post(image_id, image).await
    }

    /// Update image access control or metadata: PATCH `base_api()/{image_id}`.
    /// On an access-control change the server purges cached variants.
    pub async fn update_image(&self, image_id: &str, patch: &ImagePatch) -> Result<Response> {
        let url = format!("{}/{}", self.base_api(), image_id);
        self.send(self.client.patch(&url).json(patch)).await
    }

    /// List images via the v2 endpoint. Parameters are validated locally
    /// before any request is made.
    pub async fn list_images(&self, params: ListImagesParams) -> Result<Response> {
        params.validate()?;

        let mut query: Vec<(&str, String)> = vec![
            ("per_page", params.per_page.to_string()),
            ("sort_order", params.sort_order.clone()),
        ];
        if let Some(token) = &params.continuation_token {
            query.push(("continuation_token", token.clone()));
        }

        self.send(self.client.get(self.v2_api()).query(&query)).await
    }

    /// Fetch account usage counts: GET `base_api()/stats`.
    pub async fn get_usage_statistics(&self) -> Result<Response> {
        let url = format!("{}/stats", self.base_api());
        self.send(self.client.get(&url)).await
    }

    /// Fetch a short-lived batch token: GET `base_api()/batch_token`.
    /// The expiry in the response is informational; nothing here tracks it.
    pub async fn get_batch_token(&self) -> Result<Response> {
        let url = format!("{}/batch_token", self.base_api());
        self.send(self.client.get(&url)).await
    }

    /// Fetch a batch token and return a new client that authenticates with
    /// it against the batch host, bypassing per-minute rate limits. The
    /// original client is untouched and shares its connection pool with the
    /// derived one.
    pub async fn create_batch_api(&self) -> Result<ImagesClient> {
        let response = self
            .get_batch_token()
            .await
            .map_err(|e| Error::BatchToken(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Batch token request failed (status {}): {}", status, body);
            return Err(Error::BatchToken(format!(
                "token request returned status {}",
                status
            )));
        }

        let envelope: ApiEnvelope<BatchToken> = response
            .json()
            .await
            .map_err(|e| Error::BatchToken(format!("could not parse token response: {}", e)))?;
        let token = envelope
            .result
            .ok_or_else(|| Error::BatchToken("no result in token response".to_string()))?
            .token;

        Ok(Self {
            client: self.client.clone(),
            credentials: self.credentials.for_batch(token),
            api_root: self.api_root.clone(),
            delivery_root: self.delivery_root.clone(),
            batch_root: self.batch_root.clone(),
        })
    }
}
