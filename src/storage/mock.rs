use super::ImageStorage;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory storage backend for tests and dry runs.
#[derive(Clone)]
pub struct MockImageStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    delivery_base: String,
    save_count: Arc<Mutex<usize>>,
    open_count: Arc<Mutex<usize>>,
    delete_count: Arc<Mutex<usize>>,
    exists_count: Arc<Mutex<usize>>,
}

impl MockImageStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            delivery_base: "https://imagedelivery.net/mock-hash".to_string(),
            save_count: Arc::new(Mutex::new(0)),
            open_count: Arc::new(Mutex::new(0)),
            delete_count: Arc::new(Mutex::new(0)),
            exists_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_delivery_base(mut self, delivery_base: String) -> Self {
        self.delivery_base = delivery_base;
        self
    }

    pub fn with_image(self, name: String, content: Vec<u8>) -> Self {
        self.files.lock().unwrap().insert(name, content);
        self
    }

    pub fn get_save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    pub fn get_open_count(&self) -> usize {
        *self.open_count.lock().unwrap()
    }

    pub fn get_delete_count(&self) -> usize {
        *self.delete_count.lock().unwrap()
    }

    pub fn get_exists_count(&self) -> usize {
        *self.exists_count.lock().unwrap()
    }
}

impl Default for MockImageStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStorage for MockImageStorage {
    async fn open(&self, name: &str) -> Result<Vec<u8>> {
        let mut count = self.open_count.lock().unwrap();
        *count += 1;

        let files = self.files.lock().unwrap();
        files.get(name).cloned().ok_or_else(|| Error::Api {
            status: StatusCode::NOT_FOUND,
            body: format!("image not found: {}", name),
        })
    }

    async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
        let mut count = self.save_count.lock().unwrap();
        *count += 1;

        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_vec());
        Ok(self.url(name))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut count = self.delete_count.lock().unwrap();
        *count += 1;

        self.files.lock().unwrap().remove(name);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let mut count = self.exists_count.lock().unwrap();
        *count += 1;

        Ok(self.files.lock().unwrap().contains_key(name))
    }

    async fn size(&self, name: &str) -> Result<u64> {
        self.open(name).await.map(|content| content.len() as u64)
    }

    fn url(&self, name: &str) -> String {
        self.url_variant(name, "public")
    }

    fn url_variant(&self, name: &str, variant: &str) -> String {
        format!("{}/{}/{}", self.delivery_base, name, variant)
    }
}
