//! Context builder — selects the knowledge subset injected into a prompt.
//!
//! Matching is pure substring containment over lower-cased text: no
//! stemming, no fuzzy matching, no scoring. This is a deliberate cheap
//! heuristic, not a placeholder for semantic search. Selection order is
//! knowledge-store order: the first matches win, not the best matches.

use crate::store::{BlogPost, KnowledgeBase, Project};

/// At most this many projects are injected per query.
const MAX_PROJECTS: usize = 2;
/// At most this many blog posts are injected per query.
const MAX_BLOG_POSTS: usize = 2;

/// Build the context blob for a query.
///
/// The identity block (name, title, summary) is always present, even for
/// an empty knowledge base. Relevant projects and blog posts are appended
/// under labeled headings; skills and experience blocks are appended only
/// when the query contains their trigger words.
pub fn build_context(query: &str, kb: &KnowledgeBase) -> String {
    let query_lower = query.to_lowercase();
    let mut context: Vec<String> = Vec::new();

    // Identity block, always included
    context.push(format!("Name: {}", kb.personal_info.name));
    context.push(format!("Role: {}", kb.personal_info.title));
    context.push(format!("Background: {}", kb.professional_summary));

    let relevant_projects: Vec<&Project> = kb
        .projects
        .iter()
        .filter(|p| project_matches(p, &query_lower))
        .take(MAX_PROJECTS)
        .collect();

    if !relevant_projects.is_empty() {
        context.push("\nRelevant Projects:".into());
        for project in relevant_projects {
            context.push(format!("\n- {}: {}", project.title, project.description));
            context.push(format!(
                "  Technologies: {}",
                project.technologies.join(", ")
            ));
            context.push(format!(
                "  Achievements: {}",
                project.achievements.join("; ")
            ));
        }
    }

    let relevant_blogs: Vec<&BlogPost> = kb
        .blog_posts
        .iter()
        .filter(|b| blog_matches(b, &query_lower))
        .take(MAX_BLOG_POSTS)
        .collect();

    if !relevant_blogs.is_empty() {
        context.push("\nRelevant Blog Posts:".into());
        for blog in relevant_blogs {
            context.push(format!("\n- {}", blog.title));
            context.push(format!("  URL: {}", blog.url));
            context.push(format!("  Summary: {}", blog.summary));
        }
    }

    if contains_any(&query_lower, &["skill", "expertise", "technology"]) {
        context.push("\nKey Skills:".into());
        for (category, skills) in &kb.skills {
            context.push(format!("\n{}: {}", category, skills.technologies.join(", ")));
        }
    }

    if contains_any(&query_lower, &["experience", "work", "job"]) {
        context.push("\nWork Experience:".into());
        for exp in &kb.experience {
            context.push(format!(
                "\n- {} at {} ({})",
                exp.title, exp.company, exp.duration
            ));
            context.push(format!("  {}", exp.description));
        }
    }

    context.join("\n")
}

/// A project is relevant if any of its keywords appears in the query, or
/// any query token longer than 3 characters appears in its searchable text.
fn project_matches(project: &Project, query_lower: &str) -> bool {
    let search_text = format!(
        "{} {} {}",
        project.title,
        project.description,
        project.keywords.join(" ")
    )
    .to_lowercase();

    project
        .keywords
        .iter()
        .any(|kw| query_lower.contains(&kw.to_lowercase()))
        || token_match(query_lower, &search_text)
}

/// Same relevance rule for blog posts, over title + topics.
fn blog_matches(blog: &BlogPost, query_lower: &str) -> bool {
    let search_text = format!("{} {}", blog.title, blog.topics.join(" ")).to_lowercase();

    blog.topics
        .iter()
        .any(|topic| query_lower.contains(&topic.to_lowercase()))
        || token_match(query_lower, &search_text)
}

fn token_match(query_lower: &str, search_text: &str) -> bool {
    query_lower
        .split_whitespace()
        .any(|word| word.chars().count() > 3 && search_text.contains(word))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
