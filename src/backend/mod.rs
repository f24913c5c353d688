// Remote catalog backend abstraction

pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::CatalogResult;

pub use supabase::SupabaseBackend;

/// Row queries and storage URL generation against a hosted backend.
///
/// The handle is built once at startup and shared behind an `Arc`;
/// implementations hold no per-request state.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Fetch every row of `collection`, unfiltered and unpaginated.
    async fn query(&self, collection: &str) -> CatalogResult<Vec<Value>>;

    /// Derive the public URL of an object. No network round-trip.
    fn public_url(&self, bucket: &str, path: &str) -> CatalogResult<String>;

    /// Ask the backend for a time-limited URL to a private object.
    async fn create_signed_url(&self, bucket: &str, path: &str, ttl_secs: u64) -> CatalogResult<String>;

    /// Short name used in logs and health output.
    fn name(&self) -> &str;
}
