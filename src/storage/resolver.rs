//! Storage URL Resolver
//!
//! Turns a `(bucket, path)` reference into a URL a browser can fetch:
//!
//! - **Public**: derived from the backend's public object endpoint. No I/O,
//!   so the same input always yields byte-identical output.
//! - **Signed**: a time-limited URL minted by the backend. The expiry is read
//!   back out of the embedded token for display, but never enforced here;
//!   dereferencing an expired URL fails at the media layer.
//!
//! Each call is a single logical attempt from the caller's point of view.
//! Transient backend failures on signing are retried with bounded backoff.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::RemoteBackend;
use crate::config::{RetrySettings, DEFAULT_SIGNED_URL_TTL_SECS};
use crate::types::{CatalogError, CatalogResult};
use crate::utils::retry::{with_backoff, RetryPolicy};

/// How a storage object should be exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResolveMode {
    Public,
    Signed { ttl_secs: u64 },
}

impl ResolveMode {
    pub fn signed_default() -> Self {
        ResolveMode::Signed {
            ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
        }
    }
}

/// A fully-qualified URL for a storage object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUrl {
    pub url: String,
    pub mode: ResolveMode,
    /// Expiry embedded in a signed URL's token, when it carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct UrlResolver {
    backend: Arc<dyn RemoteBackend>,
    retry: RetryPolicy,
}

impl UrlResolver {
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, settings: &RetrySettings) -> Self {
        self.retry = RetryPolicy::from(settings);
        self
    }

    pub async fn resolve(&self, bucket: &str, path: &str, mode: ResolveMode) -> CatalogResult<ResolvedUrl> {
        validate_reference(bucket, path)?;

        let raw = match mode {
            ResolveMode::Public => self.backend.public_url(bucket, path)?,
            ResolveMode::Signed { ttl_secs } => {
                if ttl_secs == 0 {
                    return Err(CatalogError::invalid_reference(bucket, path, "signed URL TTL must be positive"));
                }
                with_backoff(&self.retry, "create_signed_url", || {
                    self.backend.create_signed_url(bucket, path, ttl_secs)
                })
                .await?
            }
        };

        let url = parse_fetchable(bucket, path, &raw)?;
        let expires_at = match mode {
            ResolveMode::Public => None,
            ResolveMode::Signed { .. } => {
                let expiry = embedded_expiry(&url);
                if expiry.is_none() {
                    warn!(bucket = %bucket, path = %path, "Signed URL carries no readable expiry");
                }
                expiry
            }
        };

        debug!(bucket = %bucket, path = %path, ?mode, "Resolved storage object");

        Ok(ResolvedUrl {
            url: url.to_string(),
            mode,
            expires_at,
        })
    }
}

/// Reject references that are not relative paths inside a named bucket.
pub fn validate_reference(bucket: &str, path: &str) -> CatalogResult<()> {
    if bucket.trim().is_empty() {
        return Err(CatalogError::invalid_reference(bucket, path, "bucket name is empty"));
    }
    if bucket.contains('/') {
        return Err(CatalogError::invalid_reference(bucket, path, "bucket name contains '/'"));
    }
    if path.trim().is_empty() {
        return Err(CatalogError::invalid_reference(bucket, path, "object path is empty"));
    }
    if path.contains("://") {
        return Err(CatalogError::invalid_reference(bucket, path, "object path is already a URL"));
    }
    if path.starts_with('/') {
        return Err(CatalogError::invalid_reference(bucket, path, "object path must be relative"));
    }
    Ok(())
}

fn parse_fetchable(bucket: &str, path: &str, raw: &str) -> CatalogResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| CatalogError::resolution(bucket, path, format!("backend returned an unusable URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CatalogError::resolution(
            bucket,
            path,
            format!("backend returned a non-http URL scheme '{}'", other),
        )),
    }
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Read the `exp` claim from a signed URL's `token` query parameter.
///
/// The token is a JWT; only its payload segment is decoded; the signature is
/// the backend's business.
pub fn embedded_expiry(url: &Url) -> Option<DateTime<Utc>> {
    let token = url
        .query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())?;

    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;

    Utc.timestamp_opt(claims.exp?, 0).single()
}
