//! Prompt assembly: the fixed system instruction plus per-query context.

use folio_core::message::Turn;
use folio_knowledge::KnowledgeBase;

/// How many history turns are replayed into each new prompt
/// (3 user/assistant exchange pairs).
pub const HISTORY_WINDOW: usize = 6;

/// The fixed system instruction: assistant persona and behavioral
/// guidelines. Built from the knowledge base identity only — never from
/// user input.
pub fn system_prompt(kb: &KnowledgeBase) -> String {
    let name = &kb.personal_info.name;
    let title = &kb.personal_info.title;

    format!(
        "You are the AI assistant on {name}'s portfolio site. \
{name} is a {title}.

PERSONALITY:
- Friendly and approachable, but professional
- Use first person when talking about {name}'s work (\"I built...\", \"my project...\")
- Be concise but informative
- Show genuine interest in helping

GUIDELINES:
1. Answer questions about projects, skills, experience, and blog posts
2. Provide specific technical details when asked
3. Suggest relevant blog posts when appropriate
4. Offer to help with specific actions (schedule a call, download the resume)
5. If you don't know something, be honest and offer to connect the visitor with {name}
6. Keep responses under 200 words unless a detailed explanation is requested
7. Include relevant links when mentioning projects or blog posts
8. Use the provided context to give accurate, specific answers"
    )
}

/// Assemble the ordered prompt for one chat turn:
/// [system instruction, system context, recent history, new user turn].
pub fn assemble(system: String, context: &str, history: &[Turn], query: &str) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(Turn::system(system));
    messages.push(Turn::system(format!("Relevant Context:\n{context}")));
    messages.extend(history.iter().cloned());
    messages.push(Turn::user(query));
    messages
}
