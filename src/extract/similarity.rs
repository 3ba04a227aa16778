//! Embedding-similarity matching against the catalog.

use crate::catalog::SkillCatalog;

/// Shared by every matching stage.
pub const SIMILARITY_THRESHOLD: f32 = 0.85;

/// First catalog entry whose cosine similarity to `vector` strictly
/// exceeds the threshold, in fixed catalog order.
///
/// First-over-threshold (rather than best-of-all) is deliberate: it keeps
/// matching linear in catalog size and makes catalog order the tiebreaker.
pub fn first_match<'c>(catalog: &'c SkillCatalog, vector: &[f32]) -> Option<&'c str> {
    catalog
        .entries()
        .find(|entry| cosine_similarity(vector, &entry.vector) > SIMILARITY_THRESHOLD)
        .map(|entry| entry.name.as_str())
}

/// Cosine similarity in `[-1.0, 1.0]`. Mismatched lengths, empty vectors,
/// and zero-norm vectors all yield `0.0` so they can never match.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::catalog_with_vectors;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_first_over_threshold_wins() {
        // Both entries exceed the threshold for the query; catalog order
        // decides, not the higher score.
        let catalog = catalog_with_vectors(&[
            ("ReactJS", &[0.95, 0.05]),
            ("React", &[1.0, 0.0]),
        ]);

        assert_eq!(first_match(&catalog, &[1.0, 0.0]), Some("ReactJS"));
    }

    #[test]
    fn test_no_match_below_threshold() {
        let catalog = catalog_with_vectors(&[("Java", &[0.0, 1.0])]);
        assert_eq!(first_match(&catalog, &[1.0, 0.0]), None);
    }

    #[test]
    fn test_near_threshold_does_not_match() {
        // Similar but under the threshold (cosine ~0.8).
        let catalog = catalog_with_vectors(&[("Java", &[0.8, 0.6])]);
        assert_eq!(first_match(&catalog, &[1.0, 0.0]), None);
    }
}
