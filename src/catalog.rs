//! Skill catalog: the canonical skill names and their annotated form.
//!
//! Built once at startup from a JSON file and read-only afterwards. Every
//! name is run through the annotator a single time so exact token patterns
//! and similarity vectors never have to re-annotate catalog entries.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::annotate::{AnnotateError, Annotator};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("catalog file is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog record {key:?} has no \"name\" string field")]
    MissingName { key: String },

    #[error("catalog contains no records")]
    Empty,

    #[error("failed to annotate catalog name {name:?}: {source}")]
    Annotate {
        name: String,
        source: AnnotateError,
    },
}

#[derive(Debug, Clone)]
pub struct SkillCatalogEntry {
    /// Canonical skill name, exactly as in the catalog file.
    pub name: String,
    /// The annotator's tokenization of the name (surface texts), kept for
    /// exact token-sequence pattern matching.
    pub tokens: Vec<String>,
    /// Mean of the name's token vectors.
    pub vector: Vec<f32>,
}

/// Immutable, order-preserving skill catalog.
///
/// Iteration order is the insertion order of the source file. The
/// similarity matcher takes the first entry over threshold, so this order
/// is semantically significant and must stay fixed across runs.
pub struct SkillCatalog {
    entries: Vec<SkillCatalogEntry>,
}

impl SkillCatalog {
    /// Loads the catalog from a JSON object whose values are records with
    /// at least a `name` string field (the shape the catalog exporter
    /// produces). Missing file, malformed JSON, or a record without a name
    /// are all fatal.
    pub fn load(path: &Path, annotator: &dyn Annotator) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        // serde_json is built with preserve_order, so iterating the map
        // yields records in file order.
        let records: serde_json::Map<String, Value> = serde_json::from_str(&raw)?;

        let mut names = Vec::with_capacity(records.len());
        for (key, value) in &records {
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| CatalogError::MissingName { key: key.clone() })?;
            names.push(name.to_string());
        }

        Self::build(names, annotator)
    }

    /// Builds a catalog from an ordered list of names, annotating each one.
    /// Duplicate names keep their first occurrence.
    pub fn build(
        names: impl IntoIterator<Item = String>,
        annotator: &dyn Annotator,
    ) -> Result<Self, CatalogError> {
        let mut entries = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for name in names {
            if !seen.insert(name.clone()) {
                log::warn!("duplicate catalog name {name:?}, keeping the first occurrence");
                continue;
            }

            let doc = annotator
                .annotate(&name)
                .map_err(|source| CatalogError::Annotate {
                    name: name.clone(),
                    source,
                })?;

            entries.push(SkillCatalogEntry {
                tokens: doc.tokens.iter().map(|t| t.text.clone()).collect(),
                vector: doc.vector(),
                name,
            });
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(SkillCatalog { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in fixed catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &SkillCatalogEntry> {
        self.entries.iter()
    }
}
