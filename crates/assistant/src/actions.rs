//! Quick-action suggestions — a pure function of the query and reply.

use serde::Serialize;

/// The closed set of quick actions the hosting UI can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickAction {
    TryModelDemo,
    DownloadResume,
    ScheduleCall,
    SeeAllProjects,
}

/// At most this many actions are suggested per reply.
const MAX_ACTIONS: usize = 2;

/// Suggest quick actions from independent keyword checks on the query
/// and reply. Returns `None` when nothing triggered.
pub fn suggest_actions(query: &str, reply: &str) -> Option<Vec<QuickAction>> {
    let query_lower = query.to_lowercase();
    let mut actions = Vec::new();

    if contains_any(&query_lower, &["model", "demo", "try"]) {
        actions.push(QuickAction::TryModelDemo);
    }

    if contains_any(&query_lower, &["experience", "resume", "cv"]) {
        actions.push(QuickAction::DownloadResume);
    }

    if contains_any(&query_lower, &["talk", "discuss", "meeting"]) {
        actions.push(QuickAction::ScheduleCall);
    }

    if reply.to_lowercase().contains("project") && actions.len() < MAX_ACTIONS {
        actions.push(QuickAction::SeeAllProjects);
    }

    if actions.is_empty() { None } else { Some(actions) }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
