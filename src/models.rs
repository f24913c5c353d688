use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::RemoteBackend;
use crate::catalog::{CatalogFetcher, CatalogStore};
use crate::config::Config;
use crate::content::PortfolioContent;
use crate::storage::UrlResolver;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: CatalogFetcher,
    pub resolver: UrlResolver,
    pub store: CatalogStore,
    pub content: Arc<PortfolioContent>,
}

impl AppState {
    /// Wire the shared backend handle into the resolver, fetcher and store.
    pub fn new(config: Config, backend: Arc<dyn RemoteBackend>, content: PortfolioContent) -> Self {
        let fetcher = CatalogFetcher::new(backend.clone(), config.catalog.clone()).with_retry(&config.retry);
        let resolver = UrlResolver::new(backend).with_retry(&config.retry);

        Self {
            config: Arc::new(config),
            fetcher,
            resolver,
            store: CatalogStore::new(),
            content: Arc::new(content),
        }
    }
}

/// Row identifier as stored by the catalog: integer keys or text/uuid keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Int(id) => write!(f, "{}", id),
            ProjectId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A motion-graphics project row as it lives in the remote catalog.
///
/// `thumbnail_path` and `video_path` are bucket-relative object paths,
/// never URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProject {
    pub id: ProjectId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub title: String,
    #[serde(default, alias = "shortDescription", deserialize_with = "nullable_text")]
    pub short_description: String,
    #[serde(default, alias = "longDescription", deserialize_with = "nullable_text")]
    pub long_description: String,
    #[serde(alias = "thumbnailPath")]
    pub thumbnail_path: String,
    #[serde(alias = "videoPath")]
    pub video_path: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub category: String,
    #[serde(default, deserialize_with = "tools_list")]
    pub tools: Vec<String>,
    #[serde(default, deserialize_with = "display_scalar")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "display_scalar")]
    pub year: Option<String>,
}

/// Which media asset of a row a fault refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaAsset {
    Thumbnail,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFault {
    pub asset: MediaAsset,
    pub message: String,
}

/// A catalog row plus URLs derived for this fetch cycle only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMediaProject {
    #[serde(flatten)]
    pub project: MediaProject,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<MediaFault>,
}

impl ResolvedMediaProject {
    pub fn id(&self) -> &ProjectId {
        &self.project.id
    }

    pub fn category(&self) -> &str {
        &self.project.category
    }

    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub backend: String,
    pub catalog_loading: bool,
}

// Tools are stored either as a JSON array or as one comma-separated string.
fn tools_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tools {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Tools>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Tools::List(items)) => items
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Tools::Joined(joined)) => joined
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    })
}

// Nullable text columns come back as `null` when empty.
fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Display-only scalars may arrive as numbers ("year": 2024) or strings ("2:15").
fn display_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
