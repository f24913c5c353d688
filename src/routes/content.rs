use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::content::{filter_projects, IconDescriptor, Project};
use crate::models::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/profile", get(profile))
        .route("/api/projects", get(projects))
        .route("/api/skills", get(skills))
        .with_state(state)
}

async fn profile(State(state): State<AppState>) -> Json<serde_json::Value> {
    let content = &state.content;
    let social_links: Vec<_> = content
        .social_links
        .iter()
        .map(|link| {
            serde_json::json!({
                "name": link.name,
                "url": link.url,
                "icon": link.icon.descriptor(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "personal": content.personal,
        "about": {
            "paragraphs": content.about.paragraphs(),
            "education": content.about.education,
        },
        "social_links": social_links,
        "contact_form": content.contact_form,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub filter: Option<String>,
}

async fn projects(State(state): State<AppState>, Query(query): Query<ProjectQuery>) -> Json<Vec<Project>> {
    let filter = query.filter.unwrap_or_else(|| "all".to_string());
    Json(
        filter_projects(&state.content.projects, &filter)
            .into_iter()
            .cloned()
            .collect(),
    )
}

#[derive(Debug, Serialize)]
pub struct SkillView {
    pub name: String,
    pub level: u8,
    pub icon: IconDescriptor,
}

#[derive(Debug, Serialize)]
pub struct SkillGroupView {
    pub category: &'static str,
    pub skills: Vec<SkillView>,
}

async fn skills(State(state): State<AppState>) -> Json<Vec<SkillGroupView>> {
    let groups = state
        .content
        .skills
        .groups()
        .into_iter()
        .map(|(category, skills)| SkillGroupView {
            category,
            skills: skills
                .iter()
                .map(|s| SkillView {
                    name: s.name.clone(),
                    level: s.level,
                    icon: s.icon.descriptor(),
                })
                .collect(),
        })
        .collect();

    Json(groups)
}
