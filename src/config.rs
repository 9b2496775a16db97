//! Credential loading and validation
//!
//! Credentials come from the environment (or a `.env` file) and are
//! validated once at construction. Required fields that are missing or
//! empty are all reported in a single error rather than one at a time.

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

const ENV_ACCOUNT_ID: &str = "CF_ACCT_ID";
const ENV_ACCOUNT_HASH: &str = "CF_IMG_HASH";
const ENV_API_TOKEN: &str = "CF_IMG_TOKEN";
const ENV_CLIENT_API_VERSION: &str = "CLOUDFLARE_CLIENT_API_VERSION";
const ENV_IMAGES_API_VERSION: &str = "CLOUDFLARE_IMAGES_API_VERSION";
const ENV_TIMEOUT: &str = "CF_IMG_TOKEN_TIMEOUT";

const DEFAULT_CLIENT_API_VERSION: &str = "v4";
const DEFAULT_IMAGES_API_VERSION: &str = "v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Account credentials and request settings for the Cloudflare Images API.
///
/// Immutable after construction; deriving a batch-mode client produces a
/// new value via [`Credentials::for_batch`] and never mutates the original.
#[derive(Clone)]
pub struct Credentials {
    /// Cloudflare account ID.
    pub account_id: String,
    /// Account hash used in delivery URLs, assigned with the Images account.
    pub account_hash: String,
    /// API token sent as a bearer authorization header.
    pub api_token: String,
    /// Version segment in the middle of API URLs.
    pub client_api_version: String,
    /// Version segment at the end of API URLs.
    pub images_api_version: String,
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// When set, requests target the batch host instead of the account API.
    pub is_batch: bool,
}

impl Credentials {
    /// Build credentials from explicit values, validating that all required
    /// fields are non-empty. The error names every missing field.
    pub fn new(
        account_id: impl Into<String>,
        account_hash: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self> {
        let account_id = account_id.into();
        let account_hash = account_hash.into();
        let api_token = api_token.into();

        let mut missing = Vec::new();
        if account_id.is_empty() {
            missing.push(ENV_ACCOUNT_ID.to_string());
        }
        if account_hash.is_empty() {
            missing.push(ENV_ACCOUNT_HASH.to_string());
        }
        if api_token.is_empty() {
            missing.push(ENV_API_TOKEN.to_string());
        }
        if !missing.is_empty() {
            return Err(Error::Config(missing));
        }

        Ok(Self {
            account_id,
            account_hash,
            api_token,
            client_api_version: DEFAULT_CLIENT_API_VERSION.to_string(),
            images_api_version: DEFAULT_IMAGES_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            is_batch: false,
        })
    }

    /// Load credentials from a `.env` file (when present) and the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup. Used by
    /// `from_env` and directly testable without touching process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let account_id = required(ENV_ACCOUNT_ID);
        let account_hash = required(ENV_ACCOUNT_HASH);
        let api_token = required(ENV_API_TOKEN);

        let missing: Vec<String> = [
            (ENV_ACCOUNT_ID, &account_id),
            (ENV_ACCOUNT_HASH, &account_hash),
            (ENV_API_TOKEN, &api_token),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key.to_string())
        .collect();
        if !missing.is_empty() {
            return Err(Error::Config(missing));
        }

        let timeout = match lookup(ENV_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::Validation(format!(
                        "{} must be a number of seconds, got {:?}",
                        ENV_TIMEOUT, raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            account_id: account_id.unwrap_or_default(),
            account_hash: account_hash.unwrap_or_default(),
            api_token: api_token.unwrap_or_default(),
            client_api_version: lookup(ENV_CLIENT_API_VERSION)
                .unwrap_or_else(|| DEFAULT_CLIENT_API_VERSION.to_string()),
            images_api_version: lookup(ENV_IMAGES_API_VERSION)
                .unwrap_or_else(|| DEFAULT_IMAGES_API_VERSION.to_string()),
            timeout,
            is_batch: false,
        })
    }

    /// Override the client API version segment.
    pub fn with_client_api_version(mut self, version: impl Into<String>) -> Self {
        self.client_api_version = version.into();
        self
    }

    /// Override the images API version segment.
    pub fn with_images_api_version(mut self, version: impl Into<String>) -> Self {
        self.images_api_version = version.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Derive credentials for a batch-mode client: same account fields, the
    /// short-lived batch token in place of the API token, batch flag set.
    pub(crate) fn for_batch(&self, token: String) -> Self {
        Self {
            api_token: token,
            is_batch: true,
            ..self.clone()
        }
    }
}

// Manual Debug so the API token never lands in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("account_hash", &self.account_hash)
            .field("api_token", &"<redacted>")
            .field("client_api_version", &self.client_api_version)
            .field("images_api_version", &self.images_api_version)
            .field("timeout", &self.timeout)
            .field("is_batch", &self.is_batch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reports_all_missing_fields() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();
        match err {
            crate::Error::Config(missing) => {
                assert_eq!(missing, vec!["CF_ACCT_ID", "CF_IMG_HASH", "CF_IMG_TOKEN"]);
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_reports_remaining_missing_fields() {
        let err =
            Credentials::from_lookup(lookup_from(&[("CF_ACCT_ID", "ABC")])).unwrap_err();
        match err {
            crate::Error::Config(missing) => {
                assert_eq!(missing, vec!["CF_IMG_HASH", "CF_IMG_TOKEN"]);
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("CF_ACCT_ID", "ABC"),
            ("CF_IMG_HASH", ""),
            ("CF_IMG_TOKEN", "XYZ"),
        ]))
        .unwrap_err();
        match err {
            crate::Error::Config(missing) => assert_eq!(missing, vec!["CF_IMG_HASH"]),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("CF_ACCT_ID", "ABC"),
            ("CF_IMG_HASH", "DEF"),
            ("CF_IMG_TOKEN", "XYZ"),
        ]))
        .unwrap();
        assert_eq!(creds.client_api_version, "v4");
        assert_eq!(creds.images_api_version, "v1");
        assert_eq!(creds.timeout, Duration::from_secs(60));
        assert!(!creds.is_batch);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("CF_ACCT_ID", "ABC"),
            ("CF_IMG_HASH", "DEF"),
            ("CF_IMG_TOKEN", "XYZ"),
            ("CLOUDFLARE_CLIENT_API_VERSION", "v5"),
            ("CLOUDFLARE_IMAGES_API_VERSION", "v3"),
            ("CF_IMG_TOKEN_TIMEOUT", "15"),
        ]))
        .unwrap();
        assert_eq!(creds.client_api_version, "v5");
        assert_eq!(creds.images_api_version, "v3");
        assert_eq!(creds.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_timeout_is_a_validation_error() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("CF_ACCT_ID", "ABC"),
            ("CF_IMG_HASH", "DEF"),
            ("CF_IMG_TOKEN", "XYZ"),
            ("CF_IMG_TOKEN_TIMEOUT", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
    }

    #[test]
    fn test_new_validates_empty_fields() {
        let err = Credentials::new("", "DEF", "").unwrap_err();
        match err {
            crate::Error::Config(missing) => {
                assert_eq!(missing, vec!["CF_ACCT_ID", "CF_IMG_TOKEN"]);
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_for_batch_replaces_token_and_sets_flag() {
        let creds = Credentials::new("ABC", "DEF", "XYZ").unwrap();
        let batch = creds.for_batch("short-lived".to_string());

        assert_eq!(batch.api_token, "short-lived");
        assert!(batch.is_batch);
        assert_eq!(batch.account_id, "ABC");
        // Original untouched.
        assert_eq!(creds.api_token, "XYZ");
        assert!(!creds.is_batch);
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("ABC", "DEF", "super-secret").unwrap();
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
