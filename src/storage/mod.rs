//! Pluggable image-storage abstraction
//!
//! A small capability set (open, save, delete, exists, size, url) so the
//! Images client can be dropped into any framework's file-storage plugin
//! system without coupling the client itself to that framework.

pub mod cloudflare;
pub mod mock;

pub use cloudflare::CloudflareStorage;
pub use mock::MockImageStorage;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Fetch the stored content by name.
    async fn open(&self, name: &str) -> Result<Vec<u8>>;
    /// Store content under `name`, replacing any previous image with that
    /// name. Returns the delivery URL of the stored image.
    async fn save(&self, name: &str, content: &[u8]) -> Result<String>;
    /// Remove the image by name.
    async fn delete(&self, name: &str) -> Result<()>;
    /// Whether an image with this name is stored.
    async fn exists(&self, name: &str) -> Result<bool>;
    /// Size in bytes of the stored content.
    async fn size(&self, name: &str) -> Result<u64>;
    /// Delivery URL with the default variant. No I/O.
    fn url(&self, name: &str) -> String;
    /// Delivery URL with a named variant. No I/O.
    fn url_variant(&self, name: &str, variant: &str) -> String;
}
