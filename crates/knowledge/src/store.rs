//! The knowledge store — structured profile data, immutable after load.
//!
//! Loaded from a JSON document once at startup. If the load fails for any
//! reason, a minimal fallback with empty collections is substituted so
//! downstream lookups never hit a missing structure.

use folio_core::error::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// The root knowledge document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Identity block, always injected into context
    pub personal_info: PersonalInfo,

    /// Short professional summary, always injected into context
    #[serde(default)]
    pub professional_summary: String,

    /// Projects, in presentation order
    #[serde(default)]
    pub projects: Vec<Project>,

    /// Blog posts, in presentation order
    #[serde(default)]
    pub blog_posts: Vec<BlogPost>,

    /// Skills grouped by category
    #[serde(default)]
    pub skills: BTreeMap<String, SkillCategory>,

    /// Work experience, most recent first
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

impl KnowledgeBase {
    /// Load the knowledge document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let kb: Self = serde_json::from_str(&content)
            .map_err(|e| KnowledgeError::Malformed(e.to_string()))?;

        info!(
            path = %path.display(),
            projects = kb.projects.len(),
            blog_posts = kb.blog_posts.len(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    /// Load the knowledge document, substituting the minimal fallback on
    /// any failure. Never propagates the error.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(kb) => kb,
            Err(e) => {
                warn!(error = %e, "Failed to load knowledge base, using fallback");
                Self::fallback()
            }
        }
    }

    /// A minimal non-empty structure: identity only, empty collections.
    pub fn fallback() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: "Portfolio Owner".into(),
                title: "Software Engineer".into(),
            },
            professional_summary: String::new(),
            projects: Vec::new(),
            blog_posts: Vec::new(),
            skills: BTreeMap::new(),
            experience: Vec::new(),
        }
    }
}
