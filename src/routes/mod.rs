//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/health` - Health checks
//! - `/api/motion-graphics` - Remote media catalog (filterable by category)
//! - `/api/media/url` - Single storage URL resolution
//! - `/api/profile`, `/api/projects`, `/api/skills` - Static portfolio content
//! - `/api/contact` - Contact form
//! - `/` - Static file serving (frontend)

pub mod catalog;
pub mod contact;
pub mod content;
pub mod health;
pub mod media;
pub mod static_files;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
///
/// API routes take precedence; every other path is served from the
/// frontend build.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let static_dir = state.config.server.static_dir.clone();
    let origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(health::router(state.clone()))
        .merge(catalog::router(state.clone()))
        .merge(media::router(state.clone()))
        .merge(content::router(state.clone()))
        .merge(contact::router(state));

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(static_dir.as_deref()))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fetcher::tests::{row, FakeBackend};
    use crate::config::Config;
    use crate::content::PortfolioContent;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(backend: FakeBackend) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "SUPABASE_URL" => Some("https://demo.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon".to_string()),
            "RETRY_BASE_DELAY_MS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        AppState::new(config, Arc::new(backend), PortfolioContent::builtin().unwrap())
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(state(FakeBackend::with_rows(vec![])));
        let (status, body) = call(app, get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "fake");
        assert_eq!(body["catalog_loading"], true);
    }

    #[tokio::test]
    async fn test_motion_graphics_filtered_after_refresh() {
        let state = state(FakeBackend::with_rows(vec![
            row(1, "goverment"),
            row(2, "others"),
            row(3, "goverment"),
        ]));
        state.store.refresh(&state.fetcher).await;
        let app = create_router(state);

        let (status, body) = call(app.clone(), get("/api/motion-graphics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], false);
        assert_eq!(body["projects"].as_array().unwrap().len(), 3);
        assert_eq!(body["categories"][0]["value"], "all");

        let (_, body) = call(app, get("/api/motion-graphics?category=goverment")).await;
        let ids: Vec<i64> = body["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(
            body["projects"][0]["thumbnail_url"],
            "https://cdn.example/images/t1.jpg"
        );
    }

    #[tokio::test]
    async fn test_refresh_after_query_failure_reports_error() {
        let mut backend = FakeBackend::with_rows(vec![]);
        backend.fail_query = true;
        let app = create_router(state(backend));

        let request = Request::builder()
            .method("POST")
            .uri("/api/motion-graphics/refresh")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "query");
        assert_eq!(body["count"], 0);

        let (_, body) = call(app, get("/api/motion-graphics")).await;
        assert_eq!(body["error"], "query");
        assert_eq!(body["loading"], false);
    }

    #[tokio::test]
    async fn test_media_url_endpoint() {
        let app = create_router(state(FakeBackend::with_rows(vec![])));

        let (status, body) = call(app.clone(), get("/api/media/url?bucket=images&path=t1.jpg")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://cdn.example/images/t1.jpg");
        assert_eq!(body["mode"]["mode"], "public");

        let (status, _) = call(app.clone(), get("/api/media/url?bucket=images&path=%2Fabs.jpg")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(app, get("/api/media/url?bucket=images&path=t1.jpg&ttl=60")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signed_media_url_backend_error_is_bad_gateway() {
        let mut backend = FakeBackend::with_rows(vec![]);
        backend.missing = vec!["gone.mp4".to_string()];
        let app = create_router(state(backend));

        let (status, body) = call(app, get("/api/media/url?bucket=videos&path=gone.mp4&signed=true")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("Object not found"));
    }

    #[tokio::test]
    async fn test_static_content_endpoints() {
        let app = create_router(state(FakeBackend::with_rows(vec![])));

        let (status, body) = call(app.clone(), get("/api/profile")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["personal"]["name"], "Erick Delenia");
        assert_eq!(body["social_links"][1]["icon"]["glyph"], "github");

        let (_, body) = call(app.clone(), get("/api/projects?filter=featured")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = call(app, get("/api/skills")).await;
        assert_eq!(body[0]["category"], "programming");
        assert_eq!(body[1]["skills"][4]["icon"]["glyph"], "bar-chart-3");
    }

    #[tokio::test]
    async fn test_contact_validation() {
        let app = create_router(state(FakeBackend::with_rows(vec![])));

        let post = |payload: Value| {
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        };

        let (status, body) = call(
            app.clone(),
            post(serde_json::json!({
                "name": "Ayu",
                "email": "ayu@example.com",
                "message": "Let's work together"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let (status, body) = call(
            app,
            post(serde_json::json!({ "name": "", "email": "nope", "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"name"));
    }
}
