//! Skill pattern matching over annotated tokens.
//!
//! A closed set of pattern variants, compiled once at startup and evaluated
//! by a single dispatcher. The dispatcher scans left to right; at each
//! position the longest match wins, a catalog-exact match beats a generic
//! pattern of the same length, and the scan resumes past the match, so the
//! emitted spans never overlap.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::annotate::{Doc, Pos};
use crate::catalog::SkillCatalog;

/// Single-token surface shapes that read as technical terms.
static SURFACE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // camel case: JavaScript, PostgreSQL
        r"^[A-Z][a-z]+[A-Z][a-z]+",
        // acronyms: AWS, SQL, CI
        r"^[A-Z]{2,}$",
        // dotted: Node.js, Vue.js
        r"^[a-zA-Z]+\.[a-zA-Z]+",
        // hyphenated: scikit-learn, styled-components
        r"^[a-zA-Z]+-[a-zA-Z]+",
    ]
    .iter()
    .map(|src| Regex::new(src).expect("malformed regex"))
    .collect()
});

/// Multi-platform terms that are usually written lowercase and would slip
/// past the shape patterns.
static KNOWN_TERMS: Lazy<HashSet<String>> = Lazy::new(|| {
    ["graphql", "langchain", "vite", "nextjs"]
        .iter()
        .map(|term| term.to_string())
        .collect()
});

#[derive(Debug, Clone)]
pub enum SkillPattern {
    /// Case-sensitive token sequence of a catalog name.
    Exact(Vec<String>),
    /// Single-token regex over the surface text.
    Surface(Regex),
    /// One or more proper nouns followed by any number of common nouns.
    ProperNounSeq,
    /// Single token whose lowercase form is in a fixed term set.
    KnownTerm(HashSet<String>),
}

impl SkillPattern {
    /// Length of the match starting at token `idx`, if any.
    fn match_at(&self, doc: &Doc, idx: usize) -> Option<usize> {
        let tokens = &doc.tokens;
        match self {
            SkillPattern::Exact(seq) => {
                if seq.is_empty() || tokens.len() - idx < seq.len() {
                    return None;
                }
                seq.iter()
                    .zip(&tokens[idx..])
                    .all(|(expected, token)| *expected == token.text)
                    .then_some(seq.len())
            }
            SkillPattern::Surface(regex) => regex.is_match(&tokens[idx].text).then_some(1),
            SkillPattern::ProperNounSeq => {
                let mut len = 0;
                while idx + len < tokens.len() && tokens[idx + len].pos == Pos::Propn {
                    len += 1;
                }
                if len == 0 {
                    return None;
                }
                while idx + len < tokens.len() && tokens[idx + len].pos == Pos::Noun {
                    len += 1;
                }
                Some(len)
            }
            SkillPattern::KnownTerm(terms) => {
                terms.contains(&tokens[idx].text.to_lowercase()).then_some(1)
            }
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, SkillPattern::Exact(_))
    }
}

/// The compiled pattern set: one exact pattern per catalog entry plus the
/// generic technical-term patterns.
pub struct PatternSet {
    patterns: Vec<SkillPattern>,
}

impl PatternSet {
    pub fn compile(catalog: &SkillCatalog) -> PatternSet {
        let mut patterns: Vec<SkillPattern> = catalog
            .entries()
            .map(|entry| SkillPattern::Exact(entry.tokens.clone()))
            .collect();

        patterns.extend(
            SURFACE_PATTERNS
                .iter()
                .map(|regex| SkillPattern::Surface(regex.clone())),
        );
        patterns.push(SkillPattern::ProperNounSeq);
        patterns.push(SkillPattern::KnownTerm(KNOWN_TERMS.clone()));

        PatternSet { patterns }
    }

    /// All skill spans in the doc as half-open token ranges, left to right,
    /// non-overlapping.
    pub fn apply(&self, doc: &Doc) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut idx = 0;

        while idx < doc.tokens.len() {
            match self.best_match(doc, idx) {
                Some(len) => {
                    spans.push((idx, idx + len));
                    idx += len;
                }
                None => idx += 1,
            }
        }
        spans
    }

    /// Longest match at `idx`; on equal length an exact catalog pattern
    /// wins over a generic one.
    fn best_match(&self, doc: &Doc, idx: usize) -> Option<usize> {
        let mut best: Option<(usize, bool)> = None;

        for pattern in &self.patterns {
            if let Some(len) = pattern.match_at(doc, idx) {
                let exact = pattern.is_exact();
                let better = match best {
                    None => true,
                    Some((best_len, best_exact)) => {
                        len > best_len || (len == best_len && exact && !best_exact)
                    }
                };
                if better {
                    best = Some((len, exact));
                }
            }
        }

        best.map(|(len, _)| len)
    }
}
