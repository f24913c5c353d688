// Supabase adapter implementation
// PostgREST rows live under {base}/rest/v1, storage objects under {base}/storage/v1.
// Both are authenticated with the project's anon key, sent as `apikey` and as a bearer token.

use crate::backend::RemoteBackend;
use crate::config::BackendConfig;
use crate::types::{CatalogError, CatalogResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REST_PREFIX: &str = "rest/v1";
const STORAGE_PREFIX: &str = "storage/v1";

pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: Option<String>,
}

// Storage and PostgREST use slightly different error bodies
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl SupabaseBackend {
    pub fn new(base_url: &str, anon_key: &str) -> CatalogResult<Self> {
        Self::with_timeout(base_url, anon_key, Duration::from_secs(15))
    }

    pub fn with_timeout(base_url: &str, anon_key: &str, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Backend {
                message: format!("Failed to build HTTP client: {}", e),
                transient: false,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> CatalogResult<Self> {
        Self::with_timeout(&config.url, &config.anon_key, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn storage_url(&self, suffix: &str) -> String {
        format!("{}/{}/{}", self.base_url, STORAGE_PREFIX, suffix)
    }

    /// Turn a non-2xx response into a status error, keeping the backend's message.
    async fn error_from(response: Response) -> CatalogError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or(text);

        CatalogError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Percent-encode each segment of an object path, keeping the `/` separators.
fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl RemoteBackend for SupabaseBackend {
    async fn query(&self, collection: &str) -> CatalogResult<Vec<Value>> {
        let url = format!("{}/{}/{}", self.base_url, REST_PREFIX, collection);
        debug!(url = %url, "Querying catalog collection");

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*")])
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(CatalogError::Decode(format!(
                "expected an array of rows, got {}",
                match other {
                    Value::Object(_) => "an object",
                    Value::Null => "null",
                    _ => "a scalar",
                }
            ))),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> CatalogResult<String> {
        Ok(self.storage_url(&format!(
            "object/public/{}/{}",
            bucket,
            encode_object_path(path)
        )))
    }

    async fn create_signed_url(&self, bucket: &str, path: &str, ttl_secs: u64) -> CatalogResult<String> {
        let url = self.storage_url(&format!("object/sign/{}/{}", bucket, encode_object_path(path)));
        debug!(bucket = %bucket, path = %path, ttl_secs, "Requesting signed URL");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .json(&SignRequest { expires_in: ttl_secs })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: SignResponse = response.json().await?;
        let signed = body
            .signed_url
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CatalogError::resolution(bucket, path, "response carried no signedURL"))?;

        // The backend answers with a path relative to the storage root
        if signed.starts_with("http://") || signed.starts_with("https://") {
            Ok(signed)
        } else {
            Ok(self.storage_url(signed.trim_start_matches('/')))
        }
    }

    fn name(&self) -> &str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use mockito::Matcher;

    #[test]
    fn test_public_url_layout() {
        let backend = SupabaseBackend::new("https://demo.supabase.co/", "anon").unwrap();
        assert_eq!(
            backend.public_url("images", "t1.jpg").unwrap(),
            "https://demo.supabase.co/storage/v1/object/public/images/t1.jpg"
        );
    }

    #[test]
    fn test_path_encoding() {
        assert_eq!(encode_object_path("idul fitri.mp4"), "idul%20fitri.mp4");
        assert_eq!(encode_object_path("2024/reel/final.mp4"), "2024/reel/final.mp4");
    }

    #[tokio::test]
    async fn test_query_sends_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/motion_graphics_projects")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"title":"Reel"},{"id":2,"title":"Promo"}]"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon-key").unwrap();
        let rows = backend.query("motion_graphics_projects").await.unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_query_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/missing_table")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message":"relation \"missing_table\" does not exist"}"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon").unwrap();
        let err = backend.query("missing_table").await.unwrap_err();

        match err {
            CatalogError::Status { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("does not exist"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_rejects_non_array() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/projects")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id":1}"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon").unwrap();
        let err = backend.query("projects").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_signed_url_is_made_absolute() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/sign/videos/v1.mp4")
            .match_body(Matcher::Json(serde_json::json!({ "expiresIn": 3600 })))
            .with_status(200)
            .with_body(r#"{"signedURL":"/object/sign/videos/v1.mp4?token=abc"}"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon").unwrap();
        let url = backend.create_signed_url("videos", "v1.mp4", 3600).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            url,
            format!("{}/storage/v1/object/sign/videos/v1.mp4?token=abc", server.url())
        );
    }

    #[tokio::test]
    async fn test_signed_url_missing_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/storage/v1/object/sign/videos/v1.mp4")
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon").unwrap();
        let err = backend.create_signed_url("videos", "v1.mp4", 60).await.unwrap_err();
        assert!(matches!(err, CatalogError::Resolution { .. }));
        assert_eq!(
            AppError::Catalog(err).status_code(),
            axum::http::StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_signed_url_object_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/storage/v1/object/sign/videos/gone.mp4")
            .with_status(400)
            .with_body(r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#)
            .create_async()
            .await;

        let backend = SupabaseBackend::new(&server.url(), "anon").unwrap();
        let err = backend.create_signed_url("videos", "gone.mp4", 60).await.unwrap_err();

        assert!(!err.is_transient());
        assert!(err.to_string().contains("Object not found"));
    }
}
