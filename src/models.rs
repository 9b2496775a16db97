//! Wire types for the Cloudflare Images API
//!
//! Every response arrives in a common envelope with `success`, `errors`,
//! `messages`, and an operation-specific `result`. The client itself hands
//! raw responses back to the caller; these types exist for the places where
//! a body must actually be interpreted (batch-token extraction, the storage
//! backend) and for callers that want typed access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard Cloudflare response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub code: i64,
    pub message: String,
}

/// Metadata for one stored image, as returned by fetch/upload/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub filename: String,
    pub uploaded: DateTime<Utc>,
    #[serde(rename = "requireSignedURLs")]
    pub require_signed_urls: bool,
    /// Delivery URLs, one per variant configured on the account.
    pub variants: Vec<String>,
}

/// Short-lived token for the batch API. Expiry is reported by the server;
/// this client does not track or enforce it.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchToken {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageStatistics {
    pub count: UsageCount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageCount {
    pub current: u64,
    pub allowed: u64,
}

/// One page of the v2 listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageList {
    pub images: Vec<ImageRecord>,
    /// Opaque cursor for the next page, absent on the last page.
    pub continuation_token: Option<String>,
}

/// PATCH body for updating an image. On an access-control change the server
/// purges all cached variants.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImagePatch {
    #[serde(rename = "requireSignedURLs", skip_serializing_if = "Option::is_none")]
    pub require_signed_urls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_record_envelope_deserialization() {
        let body = r#"{
            "result": {
                "id": "target-img-id",
                "filename": "target-img-id",
                "uploaded": "2023-02-20T09:09:41.755Z",
                "requireSignedURLs": false,
                "variants": [
                    "https://imagedelivery.net/DEF/target-img-id/public",
                    "https://imagedelivery.net/DEF/target-img-id/avatar"
                ]
            },
            "success": true,
            "errors": [],
            "messages": []
        }"#;

        let envelope: ApiEnvelope<ImageRecord> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        let record = envelope.result.unwrap();
        assert_eq!(record.id, "target-img-id");
        assert!(!record.require_signed_urls);
        assert_eq!(record.variants.len(), 2);
    }

    #[test]
    fn test_error_envelope_deserialization() {
        let body = r#"{
            "result": null,
            "success": false,
            "errors": [{"code": 5404, "message": "Image not found"}],
            "messages": []
        }"#;

        let envelope: ApiEnvelope<ImageRecord> = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.errors[0].code, 5404);
    }

    #[test]
    fn test_batch_token_deserialization() {
        let body = r#"{
            "result": {"token": "abc123", "expiresAt": "2023-08-09T10:33:04Z"},
            "success": true,
            "errors": [],
            "messages": []
        }"#;

        let envelope: ApiEnvelope<BatchToken> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.result.unwrap().token, "abc123");
    }

    #[test]
    fn test_image_list_last_page_has_no_continuation_token() {
        let body = r#"{"images": [], "continuation_token": null}"#;
        let list: ImageList = serde_json::from_str(body).unwrap();
        assert!(list.images.is_empty());
        assert!(list.continuation_token.is_none());
    }

    #[test]
    fn test_image_patch_skips_unset_fields() {
        let patch = ImagePatch {
            require_signed_urls: Some(true),
            metadata: None,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"requireSignedURLs":true}"#);
    }
}
