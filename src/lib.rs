//! Client for the Cloudflare Images API
//!
//! Holds account credentials, builds request URLs, and issues one HTTP
//! request per operation (upload, fetch, delete, list, usage stats, batch
//! tokens), handing the raw response back to the caller. A pluggable
//! [`storage::ImageStorage`] trait adapts the client to framework
//! file-storage plugin systems.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use client::{ImagesClient, ListImagesParams};
pub use config::Credentials;
pub use error::{Error, Result};
