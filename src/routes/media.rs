use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::config::DEFAULT_SIGNED_URL_TTL_SECS;
use crate::models::AppState;
use crate::storage::{ResolveMode, ResolvedUrl};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/media/url", get(resolve_url))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub bucket: String,
    pub path: String,
    #[serde(default)]
    pub signed: bool,
    pub ttl: Option<u64>,
}

impl ResolveQuery {
    fn mode(&self) -> AppResult<ResolveMode> {
        match (self.signed, self.ttl) {
            (false, None) => Ok(ResolveMode::Public),
            (false, Some(_)) => Err(AppError::InvalidRequest("ttl requires signed=true".to_string())),
            (true, ttl) => Ok(ResolveMode::Signed {
                ttl_secs: ttl.unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS),
            }),
        }
    }
}

async fn resolve_url(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<ResolvedUrl>> {
    let mode = query.mode()?;
    let resolved = state.resolver.resolve(&query.bucket, &query.path, mode).await?;
    Ok(Json(resolved))
}
