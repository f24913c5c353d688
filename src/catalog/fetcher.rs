//! Catalog Fetcher
//!
//! Queries the whole project collection, then enriches every row with
//! resolved thumbnail and video URLs.
//!
//! ## Failure policy
//!
//! - **Query failure**: the fetch yields an empty snapshot tagged with
//!   [`CatalogErrorKind::Query`] and logs the error. Nothing propagates past
//!   [`CatalogFetcher::fetch_all`].
//! - **Malformed rows**: skipped with a warning, counted in the snapshot.
//! - **Resolution failure**: isolated per row. The failed URL is `None`, the
//!   row records a [`MediaFault`], and the snapshot is tagged with
//!   [`CatalogErrorKind::Resolution`]. Other rows are unaffected.
//!
//! All resolutions run concurrently; output order is always query order.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::backend::RemoteBackend;
use crate::config::{CatalogConfig, RetrySettings};
use crate::models::{MediaAsset, MediaFault, MediaProject, ResolvedMediaProject};
use crate::storage::{ResolveMode, UrlResolver};
use crate::types::{CatalogErrorKind, CatalogResult};
use crate::utils::retry::{with_backoff, RetryPolicy};

/// Result of one fetch cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub projects: Vec<ResolvedMediaProject>,
    pub error: Option<CatalogErrorKind>,
    /// Rows that could not be read as projects.
    pub skipped_rows: usize,
}

#[derive(Clone)]
pub struct CatalogFetcher {
    backend: Arc<dyn RemoteBackend>,
    resolver: UrlResolver,
    settings: CatalogConfig,
    retry: RetryPolicy,
}

impl CatalogFetcher {
    pub fn new(backend: Arc<dyn RemoteBackend>, settings: CatalogConfig) -> Self {
        Self {
            resolver: UrlResolver::new(backend.clone()),
            backend,
            settings,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, settings: &RetrySettings) -> Self {
        self.retry = RetryPolicy::from(settings);
        self.resolver = self.resolver.with_retry(settings);
        self
    }

    pub fn settings(&self) -> &CatalogConfig {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run one full fetch cycle. Never fails; see the module docs.
    pub async fn fetch_all(&self) -> CatalogSnapshot {
        let collection = &self.settings.collection;
        info!(collection = %collection, "Fetching media catalog");

        let (rows, skipped_rows) = match self.query_rows().await {
            Ok(result) => result,
            Err(e) => {
                error!(collection = %collection, error = %e, "Error loading projects");
                return CatalogSnapshot {
                    projects: Vec::new(),
                    error: Some(CatalogErrorKind::Query),
                    skipped_rows: 0,
                };
            }
        };

        let projects = self.resolve_rows(rows).await;
        let faulty = projects.iter().filter(|p| !p.is_complete()).count();

        if faulty > 0 {
            warn!(faulty, total = projects.len(), "Some projects have unresolved media");
        }
        info!(count = projects.len(), skipped_rows, "Media catalog loaded");

        CatalogSnapshot {
            error: (faulty > 0).then_some(CatalogErrorKind::Resolution),
            projects,
            skipped_rows,
        }
    }

    /// Like [`fetch_all`](Self::fetch_all), but abandons the work when `token`
    /// is cancelled. A cancelled fetch returns `None`.
    pub async fn fetch_all_cancellable(&self, token: &CancellationToken) -> Option<CatalogSnapshot> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Catalog fetch cancelled");
                None
            }
            snapshot = self.fetch_all() => Some(snapshot),
        }
    }

    /// Query every row and decode the ones that look like projects.
    pub async fn query_rows(&self) -> CatalogResult<(Vec<MediaProject>, usize)> {
        let collection = &self.settings.collection;
        let raw = with_backoff(&self.retry, "query", || self.backend.query(collection)).await?;

        let mut skipped = 0;
        let rows = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<MediaProject>(value) {
                Ok(project) => Some(project),
                Err(e) => {
                    skipped += 1;
                    warn!(index, error = %e, "Skipping malformed catalog row");
                    None
                }
            })
            .collect();

        Ok((rows, skipped))
    }

    /// Resolve media for every row concurrently, preserving input order.
    pub async fn resolve_rows(&self, rows: Vec<MediaProject>) -> Vec<ResolvedMediaProject> {
        join_all(rows.into_iter().map(|row| self.resolve_project(row))).await
    }

    pub async fn resolve_project(&self, project: MediaProject) -> ResolvedMediaProject {
        let mode: ResolveMode = self.settings.url_mode;

        let (thumbnail, video) = futures::join!(
            self.resolver
                .resolve(&self.settings.images_bucket, &project.thumbnail_path, mode),
            self.resolver
                .resolve(&self.settings.videos_bucket, &project.video_path, mode),
        );

        let mut faults = Vec::new();
        let mut settle = |asset: MediaAsset, result: CatalogResult<crate::storage::ResolvedUrl>| match result {
            Ok(resolved) => Some(resolved.url),
            Err(e) => {
                warn!(project = %project.id, ?asset, error = %e, "Media resolution failed");
                faults.push(MediaFault {
                    asset,
                    message: e.to_string(),
                });
                None
            }
        };

        let thumbnail_url = settle(MediaAsset::Thumbnail, thumbnail);
        let video_url = settle(MediaAsset::Video, video);

        ResolvedMediaProject {
            project,
            thumbnail_url,
            video_url,
            faults,
        }
    }
}
