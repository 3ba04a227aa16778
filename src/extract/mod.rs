//! The extraction pipeline: one annotation pass, three candidate sources.
//!
//! Pass order matters. The entity pass seeds the result set, the
//! noun-chunk pass skips anything already extracted, and the token pass
//! mops up single words the earlier passes missed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::annotate::{AnnotateError, Annotator, Pos};
use crate::cache::ResultCache;
use crate::catalog::SkillCatalog;
use crate::patterns::PatternSet;

pub mod context;
pub mod novel;
pub mod similarity;

pub use similarity::SIMILARITY_THRESHOLD;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("annotation failed: {0}")]
    Annotate(#[from] AnnotateError),
}

pub struct ExtractionPipeline {
    annotator: Arc<dyn Annotator>,
    catalog: Arc<SkillCatalog>,
    patterns: PatternSet,
}

impl ExtractionPipeline {
    pub fn new(annotator: Arc<dyn Annotator>, catalog: Arc<SkillCatalog>) -> ExtractionPipeline {
        let patterns = PatternSet::compile(&catalog);
        ExtractionPipeline {
            annotator,
            catalog,
            patterns,
        }
    }

    /// Extracts the deduplicated skill set from one job description.
    pub fn extract(&self, description: &str) -> Result<Vec<String>, ExtractError> {
        if description.is_empty() {
            return Ok(Vec::new());
        }

        let doc = self.annotator.annotate(description)?;
        let mut skills: HashSet<String> = HashSet::new();

        // Entity pass: pattern-matched SKILL spans, gated on context.
        for (start, end) in self.patterns.apply(&doc) {
            if context::span_in_requirement_context(&doc, start, end) {
                skills.insert(doc.span_text(start, end));
            }
        }

        // Noun-chunk pass: similarity first, heuristic as fallback.
        for &(start, end) in &doc.noun_chunks {
            let chunk_text = doc.span_text(start, end);
            if chunk_text.is_empty() || skills.contains(&chunk_text) {
                continue;
            }

            let chunk_vector = doc.span_vector(start, end);
            if let Some(name) = similarity::first_match(&self.catalog, &chunk_vector) {
                skills.insert(name.to_string());
            } else if let Some(text) = novel::span_candidate(&doc, start, end, &skills) {
                skills.insert(text);
            }
        }

        // Token pass: remaining single nouns and proper nouns.
        for idx in 0..doc.tokens.len() {
            let token = &doc.tokens[idx];
            if !token.is_alpha
                || token.is_stop
                || !matches!(token.pos, Pos::Noun | Pos::Propn)
                || skills.contains(&token.text)
            {
                continue;
            }

            if let Some(name) = similarity::first_match(&self.catalog, &token.vector) {
                skills.insert(name.to_string());
            } else if let Some(text) = novel::token_candidate(&doc, idx, &skills) {
                skills.insert(text);
            }
        }

        Ok(skills.into_iter().collect())
    }
}

/// The pipeline plus its memoization layer; one instance is shared across
/// all request handlers.
pub struct ExtractionService {
    pipeline: ExtractionPipeline,
    cache: ResultCache,
}

impl ExtractionService {
    pub fn new(pipeline: ExtractionPipeline, cache_capacity: usize) -> ExtractionService {
        ExtractionService {
            pipeline,
            cache: ResultCache::new(cache_capacity),
        }
    }

    /// Cached extraction, keyed by the exact raw description.
    pub fn extract(&self, description: &str) -> Result<Vec<String>, ExtractError> {
        self.cache
            .get_or_compute(description, || self.pipeline.extract(description))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
