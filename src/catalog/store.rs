use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::catalog::fetcher::CatalogFetcher;
use crate::models::ResolvedMediaProject;
use crate::types::CatalogErrorKind;

/// What the presentation layer observes.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub projects: Vec<ResolvedMediaProject>,
    pub loading: bool,
    pub error: Option<CatalogErrorKind>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for CatalogView {
    // Starts in the loading state, like a freshly mounted section.
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            loading: true,
            error: None,
            loaded_at: None,
        }
    }
}

struct StoreState {
    view: CatalogView,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

/// Holds the latest fetch result. Only the newest refresh may publish.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<RwLock<StoreState>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                view: CatalogView::default(),
                generation: 0,
                in_flight: None,
            })),
        }
    }

    pub async fn view(&self) -> CatalogView {
        self.inner.read().await.view.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.view.loading
    }

    /// Run a fresh fetch and publish it. Returns `false` when the result was
    /// discarded because a newer refresh or a shutdown superseded it.
    pub async fn refresh(&self, fetcher: &CatalogFetcher) -> bool {
        let (generation, token) = {
            let mut state = self.inner.write().await;
            if let Some(previous) = state.in_flight.take() {
                previous.cancel();
            }
            state.generation += 1;
            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            state.view.loading = true;
            (state.generation, token)
        };

        let snapshot = fetcher.fetch_all_cancellable(&token).await;

        let mut state = self.inner.write().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "Discarding superseded catalog fetch");
            return false;
        }
        state.in_flight = None;

        match snapshot {
            Some(snapshot) => {
                state.view = CatalogView {
                    projects: snapshot.projects,
                    loading: false,
                    error: snapshot.error,
                    loaded_at: Some(Utc::now()),
                };
                true
            }
            None => {
                state.view.loading = false;
                false
            }
        }
    }

    /// Cancel any in-flight fetch; its result will never be published.
    pub async fn shutdown(&self) {
        let mut state = self.inner.write().await;
        state.generation += 1;
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
        state.view.loading = false;
    }
}
