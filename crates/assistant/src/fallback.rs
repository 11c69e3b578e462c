//! Canned fallback replies, selected by keyword sniffing on the query.
//!
//! Used when the remote completion service fails for any reason. The
//! visitor always gets a reply; the routing keywords are the contract,
//! the prose is presentation.

/// Select a canned reply for a query. Always returns non-empty text.
pub fn fallback_reply(query: &str) -> String {
    let query_lower = query.to_lowercase();

    if contains_any(&query_lower, &["healthcare", "medical", "mammography"]) {
        return "I work a lot on healthcare AI — medical imaging pipelines for \
lesion detection and multi-pathology classification, built on modern vision \
transformer architectures.\n\nThese projects deal with the hard parts of \
medical data: class imbalance, limited labels, and strict evaluation.\n\n\
Want to know more about any specific project?"
            .into();
    }

    if contains_any(&query_lower, &["skill", "expertise", "technology"]) {
        return "My strongest areas:\n\n\
**Computer Vision** — vision transformers, object detection, medical imaging\n\
**Deep Learning** — PyTorch, self-supervised and transfer learning\n\
**NLP & LLMs** — RAG systems, fine-tuning, chat assistants\n\
**MLOps** — model deployment and production serving\n\n\
Ask me about any of these for details!"
            .into();
    }

    if contains_any(&query_lower, &["blog", "article", "write"]) {
        return "I write regularly about AI/ML — deep dives on vision \
transformers, practical LLM guides, and hands-on RAG tutorials.\n\n\
The full archive is linked from this site; ask about a topic and I'll \
point you at the right post."
            .into();
    }

    if contains_any(&query_lower, &["contact", "schedule", "call", "meeting"]) {
        return "I'd love to chat! Use the contact details on this site to \
reach me by email or LinkedIn, and I'll get back to you to set something up."
            .into();
    }

    "Thanks for your question! I can help you learn about:\n\n\
• Projects and case studies\n\
• Technical skills and expertise\n\
• Blog posts and technical writing\n\
• Work experience and background\n\n\
What would you like to know more about?"
        .into()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthcare_route() {
        let reply = fallback_reply("Tell me about your MEDICAL imaging work");
        assert!(reply.contains("healthcare AI"));
    }

    #[test]
    fn skills_route() {
        let reply = fallback_reply("what technology do you know?");
        assert!(reply.contains("strongest areas"));
    }

    #[test]
    fn blog_route() {
        let reply = fallback_reply("do you write articles?");
        assert!(reply.contains("write regularly"));
    }

    #[test]
    fn contact_route() {
        let reply = fallback_reply("can we schedule a meeting?");
        assert!(reply.contains("reach me"));
    }

    #[test]
    fn default_route_is_non_empty() {
        let reply = fallback_reply("xyzzy");
        assert!(reply.contains("What would you like to know more about?"));
        assert!(!reply.is_empty());
    }
}
