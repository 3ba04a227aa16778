//! Shared test support: a scripted annotator and a doc builder.
//!
//! The pipeline is written against the `Annotator` trait, so tests feed it
//! hand-built docs instead of a live annotation sidecar. Every doc a test
//! needs (including each catalog name) is scripted up front.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::annotate::{AnnotateError, Annotator, Dep, Doc, Pos, Token};
use crate::catalog::SkillCatalog;

/// Scripted annotator: returns pre-built docs keyed by the exact input
/// text and counts how often it is called.
#[derive(Default)]
pub struct FakeAnnotator {
    docs: HashMap<String, Doc>,
    calls: AtomicUsize,
}

impl FakeAnnotator {
    pub fn new() -> FakeAnnotator {
        FakeAnnotator::default()
    }

    pub fn script(&mut self, text: &str, doc: Doc) {
        self.docs.insert(text.to_string(), doc);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Annotator for FakeAnnotator {
    fn annotate(&self, text: &str) -> Result<Doc, AnnotateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.docs
            .get(text)
            .cloned()
            .ok_or_else(|| AnnotateError::Malformed(format!("no scripted annotation for {text:?}")))
    }
}

/// Annotator whose every call fails, for error-path tests.
pub struct FailingAnnotator;

impl Annotator for FailingAnnotator {
    fn annotate(&self, _text: &str) -> Result<Doc, AnnotateError> {
        Err(AnnotateError::Unavailable("annotator offline".to_string()))
    }
}

/// Incrementally builds a `Doc` the way an annotator would emit one.
pub struct DocBuilder {
    tokens: Vec<Token>,
    noun_chunks: Vec<(usize, usize)>,
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocBuilder {
    pub fn new() -> DocBuilder {
        DocBuilder {
            tokens: Vec::new(),
            noun_chunks: Vec::new(),
        }
    }

    pub fn token(
        mut self,
        text: &str,
        lemma: &str,
        pos: Pos,
        dep: Dep,
        head: usize,
        vector: &[f32],
    ) -> Self {
        let is_alpha = !text.is_empty() && text.chars().all(|c| c.is_alphabetic());
        self.tokens.push(Token {
            text: text.to_string(),
            lemma: lemma.to_string(),
            pos,
            dep,
            head,
            is_alpha,
            is_stop: false,
            has_space: true,
            vector: vector.to_vec(),
        });
        self
    }

    /// Marks the last token as a stop word.
    pub fn stop(mut self) -> Self {
        self.tokens.last_mut().expect("no token to mark").is_stop = true;
        self
    }

    /// Marks the last token as glued to the next (no trailing whitespace).
    pub fn glue(mut self) -> Self {
        self.tokens.last_mut().expect("no token to glue").has_space = false;
        self
    }

    pub fn chunk(mut self, start: usize, end: usize) -> Self {
        self.noun_chunks.push((start, end));
        self
    }

    pub fn build(self) -> Doc {
        Doc {
            tokens: self.tokens,
            noun_chunks: self.noun_chunks,
        }
    }
}

pub fn single_token_doc(text: &str, pos: Pos, vector: &[f32]) -> Doc {
    DocBuilder::new()
        .token(text, text, pos, Dep::Other, 0, vector)
        .build()
}

/// Catalog whose entry vectors are one-hot, in the given order. Multi-word
/// names are tokenized on whitespace.
pub fn catalog_of(names: &[&str]) -> SkillCatalog {
    let mut fake = FakeAnnotator::new();
    for (idx, name) in names.iter().enumerate() {
        let mut vector = vec![0.0; names.len()];
        vector[idx] = 1.0;

        let mut builder = DocBuilder::new();
        for word in name.split_whitespace() {
            builder = builder.token(word, word, Pos::Propn, Dep::Other, 0, &vector);
        }
        fake.script(name, builder.build());
    }

    SkillCatalog::build(names.iter().map(|name| name.to_string()), &fake)
        .expect("failed to build test catalog")
}

/// Catalog with explicit entry vectors, in the given order.
pub fn catalog_with_vectors(entries: &[(&str, &[f32])]) -> SkillCatalog {
    let mut fake = FakeAnnotator::new();
    for (name, vector) in entries {
        fake.script(name, single_token_doc(name, Pos::Propn, vector));
    }

    SkillCatalog::build(entries.iter().map(|(name, _)| name.to_string()), &fake)
        .expect("failed to build test catalog")
}
