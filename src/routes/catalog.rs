use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{category_options, filter_by_category, filter::ALL, CategoryOption};
use crate::models::{AppState, ResolvedMediaProject};
use crate::types::CatalogErrorKind;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/motion-graphics", get(list_projects))
        .route("/api/motion-graphics/refresh", post(refresh_projects))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MotionGraphicsResponse {
    pub projects: Vec<ResolvedMediaProject>,
    pub loading: bool,
    pub error: Option<CatalogErrorKind>,
    pub category: String,
    pub categories: Vec<CategoryOption>,
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<MotionGraphicsResponse> {
    let view = state.store.view().await;
    let category = query.category.unwrap_or_else(|| ALL.to_string());

    let projects = filter_by_category(&view.projects, &category)
        .into_iter()
        .cloned()
        .collect();

    Json(MotionGraphicsResponse {
        categories: category_options(&view.projects),
        projects,
        loading: view.loading,
        error: view.error,
        category,
    })
}

async fn refresh_projects(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    info!("Catalog refresh requested");

    let published = state.store.refresh(&state.fetcher).await;
    let view = state.store.view().await;

    let status = if published { StatusCode::OK } else { StatusCode::CONFLICT };
    (
        status,
        Json(serde_json::json!({
            "published": published,
            "count": view.projects.len(),
            "error": view.error,
        })),
    )
}
