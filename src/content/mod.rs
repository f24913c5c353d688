//! Static Portfolio Content
//!
//! Everything on the site that does not come from the remote catalog:
//! personal info, education, software projects, skills, social links and
//! contact-form copy. Ships with built-in content; a JSON file with the same
//! shape can replace it at startup.

pub mod icons;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use validator::Validate;

pub use icons::{IconDescriptor, SkillIcon, SocialIcon};

const BUILTIN_CONTENT: &str = include_str!("default_content.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid content in {section}: {errors}")]
    Invalid {
        section: String,
        errors: validator::ValidationErrors,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(length(min = 1))]
    pub name: String,
    pub title: String,
    pub tagline: String,
    #[validate(email)]
    pub email: String,
    pub location: String,
    pub profile_image: String,
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct About {
    pub description: String,
    pub education: Vec<Education>,
}

impl About {
    /// Description split on blank lines.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Skill {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(max = 100))]
    pub level: u8,
    pub icon: SkillIcon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSet {
    pub programming: Vec<Skill>,
    pub frameworks: Vec<Skill>,
    pub creative: Vec<Skill>,
}

impl SkillSet {
    pub fn groups(&self) -> [(&'static str, &[Skill]); 3] {
        [
            ("programming", self.programming.as_slice()),
            ("frameworks", self.frameworks.as_slice()),
            ("creative", self.creative.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    pub icon: SocialIcon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormPlaceholders {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactFormCopy {
    pub placeholder: FormPlaceholders,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioContent {
    pub personal: PersonalInfo,
    pub about: About,
    pub projects: Vec<Project>,
    pub skills: SkillSet,
    pub social_links: Vec<SocialLink>,
    pub contact_form: ContactFormCopy,
}

impl PortfolioContent {
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let content: PortfolioContent = serde_json::from_str(raw)?;
        content.check()?;
        Ok(content)
    }

    /// Load from `path` when given, otherwise the built-in content.
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let content = Self::from_json(&raw)?;
                info!(path = %path.display(), "Loaded portfolio content");
                Ok(content)
            }
            None => Self::builtin(),
        }
    }

    fn check(&self) -> Result<(), ContentError> {
        self.personal.validate().map_err(|errors| ContentError::Invalid {
            section: "personal".to_string(),
            errors,
        })?;

        for (group, skills) in self.skills.groups() {
            for skill in skills {
                skill.validate().map_err(|errors| ContentError::Invalid {
                    section: format!("skills.{}.{}", group, skill.name),
                    errors,
                })?;
            }
        }
        Ok(())
    }
}

/// Project filter used by the projects section.
///
/// `"all"` keeps everything, `"featured"` keeps featured projects, anything
/// else keeps projects with a tag whose lowercase form contains the filter.
/// The filter itself is matched as given, so filter values are lowercase.
pub fn filter_projects<'a>(projects: &'a [Project], filter: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| match filter {
            "all" => true,
            "featured" => p.featured,
            _ => p.tags.iter().any(|tag| tag.to_lowercase().contains(filter)),
        })
        .collect()
}
