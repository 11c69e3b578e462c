//! # Folio Knowledge
//!
//! The knowledge store and context builder: structured profile data
//! loaded once at startup, and the substring-matching selection that
//! grounds assistant replies in it.

pub mod context;
pub mod store;

pub use context::build_context;
pub use store::{BlogPost, ExperienceEntry, KnowledgeBase, PersonalInfo, Project, SkillCategory};
