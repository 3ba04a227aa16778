//! Heuristic detection of skills the catalog has never seen.
//!
//! Runs only after the pattern matcher and similarity matcher both miss.
//! A candidate is accepted when its surface looks technical (case, dots,
//! hyphens, noun-ness) and it sits in a requirement context.

use std::collections::HashSet;

use crate::annotate::{Doc, Pos};

use super::context;

/// Span variant: the candidate is a noun chunk. Returns the surface text
/// to add (never the lemma).
pub fn span_candidate(
    doc: &Doc,
    start: usize,
    end: usize,
    result: &HashSet<String>,
) -> Option<String> {
    let lemma = doc.tokens[start..end]
        .iter()
        .filter(|token| token.is_alpha)
        .map(|token| token.lemma.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if result.contains(&lemma) || lemma.len() <= 2 {
        return None;
    }

    let text = doc.span_text(start, end);
    let technical = text.chars().any(char::is_uppercase)
        || text.split_whitespace().any(is_uppercase_word)
        || text.contains('.')
        || text.contains('-')
        || doc.tokens[start..end]
            .iter()
            .any(|token| matches!(token.pos, Pos::Noun | Pos::Propn));

    if technical && context::span_in_requirement_context(doc, start, end) {
        Some(text)
    } else {
        None
    }
}

/// Single-token variant. The uppercase-word check collapses into "has an
/// uppercase character" since there is only one word.
pub fn token_candidate(doc: &Doc, idx: usize, result: &HashSet<String>) -> Option<String> {
    let token = &doc.tokens[idx];

    if result.contains(&token.lemma) || token.lemma.len() <= 2 {
        return None;
    }

    let technical = token.pos == Pos::Propn
        || token.text.contains('.')
        || token.text.contains('-')
        || token.text.chars().any(char::is_uppercase);

    if technical && context::token_in_requirement_context(doc, idx) {
        Some(token.text.clone())
    } else {
        None
    }
}

/// True when the word has at least one letter and every letter is
/// uppercase ("SQL", "CI/CD").
fn is_uppercase_word(word: &str) -> bool {
    let mut has_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}
