//! Requirement-context gate.
//!
//! A candidate only counts as a skill when the sentence is asking for it:
//! the token must be a direct or prepositional object whose head is a
//! requirement-signaling word.

use crate::annotate::{Dep, Doc};

/// Lowercased head texts that signal a requirement.
pub const REQUIREMENT_HEADS: [&str; 4] = ["require", "need", "use", "experience"];

pub fn token_in_requirement_context(doc: &Doc, idx: usize) -> bool {
    let token = &doc.tokens[idx];
    if !matches!(token.dep, Dep::Dobj | Dep::Pobj) {
        return false;
    }

    let head_text = doc.tokens[token.head].text.to_lowercase();
    REQUIREMENT_HEADS.contains(&head_text.as_str())
}

/// A span passes when at least one of its tokens does.
pub fn span_in_requirement_context(doc: &Doc, start: usize, end: usize) -> bool {
    (start..end).any(|idx| token_in_requirement_context(doc, idx))
}
