//! Linguistic annotation boundary.
//!
//! The annotator (tokenizer, POS tagger, dependency parser, word vectors)
//! is an external service. This module defines the [`Annotator`] trait the
//! rest of the crate is written against, plus the document model it emits.
//! The production implementation lives in `remote`; tests script their own.

use serde::Deserialize;

mod remote;

pub use remote::RemoteAnnotator;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("annotator request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("annotator unavailable: {0}")]
    Unavailable(String),

    #[error("annotator returned a malformed document: {0}")]
    Malformed(String),
}

/// Part-of-speech tag. Only nouns and proper nouns carry meaning here;
/// every other tag the annotator emits collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Pos {
    Noun,
    Propn,
    Other,
}

impl From<String> for Pos {
    fn from(tag: String) -> Pos {
        match tag.as_str() {
            "NOUN" => Pos::Noun,
            "PROPN" => Pos::Propn,
            _ => Pos::Other,
        }
    }
}

/// Dependency label. Direct and prepositional objects are the only roles
/// the requirement-context gate cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Dep {
    Dobj,
    Pobj,
    Other,
}

impl From<String> for Dep {
    fn from(label: String) -> Dep {
        match label.as_str() {
            "dobj" => Dep::Dobj,
            "pobj" => Dep::Pobj,
            _ => Dep::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the syntactic head in the owning doc. A root token is its
    /// own head.
    pub head: usize,
    pub is_alpha: bool,
    pub is_stop: bool,
    /// Whether the token is followed by whitespace in the source text.
    /// Needed to reconstruct exact span surface text ("Node.js" is three
    /// tokens with no space between them).
    #[serde(default = "default_true")]
    pub has_space: bool,
    #[serde(default)]
    pub vector: Vec<f32>,
}

fn default_true() -> bool {
    true
}

/// One annotated document: the token sequence plus the noun-phrase spans
/// the annotator found. Owned per request and discarded after extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Doc {
    pub tokens: Vec<Token>,
    /// Half-open `[start, end)` token ranges.
    #[serde(default)]
    pub noun_chunks: Vec<(usize, usize)>,
}

impl Doc {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Reconstruct the surface text of a token range.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for (idx, token) in self.tokens[start..end].iter().enumerate() {
            text.push_str(&token.text);
            if token.has_space && start + idx + 1 < end {
                text.push(' ');
            }
        }
        text
    }

    /// Span vector: mean of the member tokens' vectors. Tokens without a
    /// vector (or with a mismatched length) are skipped.
    pub fn span_vector(&self, start: usize, end: usize) -> Vec<f32> {
        mean_vector(self.tokens[start..end].iter().map(|t| t.vector.as_slice()))
    }

    /// Whole-document vector, used for catalog entries.
    pub fn vector(&self) -> Vec<f32> {
        self.span_vector(0, self.tokens.len())
    }

    /// Index bounds check over heads and noun chunks. A doc that fails this
    /// came from a buggy annotator and must not reach the pipeline.
    pub fn check(&self) -> Result<(), String> {
        for (idx, token) in self.tokens.iter().enumerate() {
            if token.head >= self.tokens.len() {
                return Err(format!(
                    "token {idx} has head {} but doc has {} tokens",
                    token.head,
                    self.tokens.len()
                ));
            }
        }
        for &(start, end) in &self.noun_chunks {
            if start >= end || end > self.tokens.len() {
                return Err(format!("noun chunk {start}..{end} is out of bounds"));
            }
        }
        Ok(())
    }
}

fn mean_vector<'a>(vectors: impl Iterator<Item = &'a [f32]>) -> Vec<f32> {
    let mut sum: Vec<f32> = Vec::new();
    let mut count = 0usize;

    for vector in vectors {
        if vector.is_empty() {
            continue;
        }
        if sum.is_empty() {
            sum = vector.to_vec();
            count = 1;
        } else if vector.len() == sum.len() {
            for (acc, value) in sum.iter_mut().zip(vector) {
                *acc += value;
            }
            count += 1;
        }
    }

    if count > 1 {
        for value in &mut sum {
            *value /= count as f32;
        }
    }
    sum
}

/// The capability boundary to the external linguistic engine.
///
/// One call annotates one document; the catalog builder and the extraction
/// pipeline are both written against this trait so they can run on a
/// scripted annotator in tests.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Doc, AnnotateError>;
}
