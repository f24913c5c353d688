use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::models::AppState;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub message: String,
}

// There is no delivery backend; accepted messages are only logged.
async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> AppResult<Json<ContactResponse>> {
    request.validate()?;

    info!(
        name = %request.name,
        email = %request.email,
        length = request.message.len(),
        "Contact form submitted"
    );

    Ok(Json(ContactResponse {
        status: "success",
        message: state.content.contact_form.success_message.clone(),
    }))
}
