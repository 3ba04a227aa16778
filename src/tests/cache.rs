//! Service-level cache behavior: transparency and bounding.

use std::sync::Arc;

use crate::annotate::{Dep, Pos};
use crate::extract::{ExtractionPipeline, ExtractionService};
use crate::tests::support::{catalog_with_vectors, DocBuilder, FakeAnnotator};

fn service_with(fake: FakeAnnotator, capacity: usize) -> (ExtractionService, Arc<FakeAnnotator>) {
    let catalog = catalog_with_vectors(&[("Java", &[0.0, 1.0])]);
    let fake = Arc::new(fake);
    let pipeline = ExtractionPipeline::new(fake.clone(), Arc::new(catalog));
    (ExtractionService::new(pipeline, capacity), fake)
}

/// "use Java" with Java as the direct object.
fn use_java_doc() -> crate::annotate::Doc {
    DocBuilder::new()
        .token("use", "use", Pos::Other, Dep::Other, 0, &[])
        .token("Java", "Java", Pos::Propn, Dep::Dobj, 0, &[0.0, 1.0])
        .build()
}

#[test]
fn test_cache_hit_equals_cold_path() {
    let mut fake = FakeAnnotator::new();
    fake.script("use Java", use_java_doc());
    let (service, fake) = service_with(fake, 10);

    let mut cold = service.extract("use Java").unwrap();
    assert_eq!(fake.calls(), 1);

    let mut warm = service.extract("use Java").unwrap();
    assert_eq!(fake.calls(), 1, "cache hit must not re-annotate");

    cold.sort();
    warm.sort();
    assert_eq!(cold, warm);
}

#[test]
fn test_empty_description_never_reaches_annotator() {
    let (service, fake) = service_with(FakeAnnotator::new(), 10);

    assert!(service.extract("").unwrap().is_empty());
    assert!(service.extract("").unwrap().is_empty());
    assert_eq!(fake.calls(), 0);
}

#[test]
fn test_whitespace_variants_are_distinct_keys() {
    let mut fake = FakeAnnotator::new();
    fake.script("use Java", use_java_doc());
    fake.script("use  Java", use_java_doc());
    let (service, fake) = service_with(fake, 10);

    service.extract("use Java").unwrap();
    service.extract("use  Java").unwrap();
    assert_eq!(fake.calls(), 2);
}

#[test]
fn test_cache_bounded_at_capacity_with_lru_eviction() {
    let placeholder = DocBuilder::new()
        .token("placeholder", "placeholder", Pos::Other, Dep::Other, 0, &[])
        .build();

    let mut fake = FakeAnnotator::new();
    for idx in 0..=1000 {
        fake.script(&format!("description {idx}"), placeholder.clone());
    }
    let (service, _) = service_with(fake, 1000);

    for idx in 0..=1000 {
        service.extract(&format!("description {idx}")).unwrap();
    }

    let cache = service.cache();
    assert_eq!(cache.len(), 1000);
    assert!(!cache.contains("description 0"), "LRU entry must be evicted");
    assert!(cache.contains("description 1"));
    assert!(cache.contains("description 1000"));
}
