//! End-to-end engine tests with a deterministic mock embedding provider:
//! selector → tag string → validator → search.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;

use shotlight_core::catalog::TagCatalog;
use shotlight_core::embedding::EmbeddingProvider;
use shotlight_core::error::EngineError;
use shotlight_core::search::{search, SearchOutcome};
use shotlight_core::tagging::{LabelBank, TagSelector, TagValidator, TopKPolicy};
use shotlight_core::types::TaggedShot;
use shotlight_core::{math, tagstring};

const CATALOG_JSON: &str = r#"{
    "Camera Angle": ["low angle", "high angle", "eye level"],
    "Relational Expression": ["arguing", "two people", "embracing"]
}"#;

/// Deterministic provider: every label maps to a fixed unit vector.
struct FixtureProvider {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixtureProvider {
    fn new() -> Self {
        let mut vectors = HashMap::new();
        // 4-dim space: camera-angle labels on axes 0-2, relational labels
        // as mixtures so rankings are nontrivial.
        vectors.insert("low angle".to_string(), vec![1.0, 0.0, 0.0, 0.0]);
        vectors.insert("high angle".to_string(), vec![0.0, 1.0, 0.0, 0.0]);
        vectors.insert("eye level".to_string(), vec![0.0, 0.0, 1.0, 0.0]);
        vectors.insert(
            "arguing".to_string(),
            math::l2_normalize(&[0.0, 0.0, 0.3, 0.9]),
        );
        vectors.insert(
            "two people".to_string(),
            math::l2_normalize(&[0.0, 0.3, 0.0, 0.9]),
        );
        vectors.insert("embracing".to_string(), vec![0.0, 0.0, 0.0, -1.0]);
        Self { vectors }
    }
}

impl EmbeddingProvider for FixtureProvider {
    fn embed_image(&self, _image: &DynamicImage, _path: &Path) -> Result<Vec<f32>, EngineError> {
        unimplemented!("engine tests feed embeddings directly")
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        texts
            .iter()
            .map(|t| {
                self.vectors.get(t).cloned().ok_or(EngineError::Model {
                    message: format!("No fixture vector for {t:?}"),
                })
            })
            .collect()
    }
}

fn policy() -> TopKPolicy {
    TopKPolicy::new("Relational Expression", 2, 1)
}

fn bank() -> Arc<LabelBank> {
    let catalog = TagCatalog::from_json(CATALOG_JSON).unwrap();
    Arc::new(LabelBank::encode_catalog(&catalog, &FixtureProvider::new()).unwrap())
}

/// An image leaning toward "low angle" and the relational pair.
fn sample_image_embedding() -> Vec<f32> {
    math::l2_normalize(&[0.8, 0.1, 0.1, 0.9])
}

#[test]
fn selector_emits_one_label_per_ordinary_category_and_two_relational() {
    let selector = TagSelector::new(bank(), policy());
    let tags = selector.select(&sample_image_embedding());

    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].category, "Camera Angle");
    assert_eq!(tags[0].labels.len(), 1);
    assert_eq!(tags[0].labels[0], "low angle");
    assert_eq!(tags[1].category, "Relational Expression");
    assert_eq!(tags[1].labels.len(), 2);
}

#[test]
fn selected_tags_round_trip_through_tag_string() {
    let selector = TagSelector::new(bank(), policy());
    let tags = selector.select(&sample_image_embedding());

    let serialized = tagstring::format(&tags).unwrap();
    let parsed = tagstring::parse(&serialized);
    assert_eq!(parsed, tags);
}

#[test]
fn selector_is_deterministic_across_runs() {
    let selector = TagSelector::new(bank(), policy());
    let image = sample_image_embedding();
    let first = selector.select(&image);
    for _ in 0..10 {
        assert_eq!(selector.select(&image), first);
    }
}

#[test]
fn selected_labels_are_never_reported_unreliable() {
    let selector = TagSelector::new(bank(), policy());
    let validator = TagValidator::new(bank(), policy(), 0.25);

    // Whatever the image, a selector pick must survive validation.
    for raw in [
        [0.8, 0.1, 0.1, 0.9],
        [0.0, 0.0, 0.0, 1.0],
        [-0.5, 0.5, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ] {
        let image = math::l2_normalize(&raw);
        let selected = selector.select(&image);
        let unreliable = validator.validate(&image);

        for entry in &selected {
            for label in &entry.labels {
                assert!(
                    !unreliable
                        .iter()
                        .any(|u| u.category == entry.category && &u.label == label),
                    "selected label {label:?} flagged unreliable for image {raw:?}"
                );
            }
        }
    }
}

#[test]
fn labels_above_threshold_are_never_reported_unreliable() {
    let validator = TagValidator::new(bank(), policy(), 0.25);
    let image = sample_image_embedding();
    let unreliable = validator.validate(&image);
    for tag in &unreliable {
        assert!(tag.score < 0.25, "tag {tag:?} at or above threshold");
    }
}

#[test]
fn validator_flags_weak_out_of_top_k_labels_with_scores() {
    let validator = TagValidator::new(bank(), policy(), 0.25);
    // Image aligned with "low angle" plus the relational pair: the other
    // camera angles score 0 and "embracing" scores negative.
    let unreliable = validator.validate(&[0.8, 0.0, 0.0, 0.6]);

    let labels: Vec<&str> = unreliable.iter().map(|u| u.label.as_str()).collect();
    assert!(labels.contains(&"high angle"));
    assert!(labels.contains(&"eye level"));
    assert!(labels.contains(&"embracing"));
    assert!(!labels.contains(&"low angle"));

    let embracing = unreliable.iter().find(|u| u.label == "embracing").unwrap();
    assert!(embracing.score < 0.0, "raw score retained, not clamped");
}

#[test]
fn search_over_generated_rows_matches_spec_scoring() {
    let catalog = TagCatalog::from_json(CATALOG_JSON).unwrap();
    let corpus = vec![
        TaggedShot {
            id: "1.1a".into(),
            shot_title: "Confrontation".into(),
            description: String::new(),
            tags: "Relational Expression: two people arguing".into(),
        },
        TaggedShot {
            id: "1.2a".into(),
            shot_title: "Standoff".into(),
            description: String::new(),
            tags: "Relational Expression: two people".into(),
        },
    ];

    let outcome = search("two people arguing loudly", &catalog, &corpus, 5);
    let SearchOutcome::Ranked {
        matched_tags,
        results,
    } = outcome
    else {
        panic!("expected ranked results");
    };

    assert_eq!(matched_tags, vec!["arguing", "two people"]);
    assert_eq!(results.len(), 2);
    assert_eq!((results[0].id.as_str(), results[0].score), ("1.1a", 2));
    assert_eq!((results[1].id.as_str(), results[1].score), ("1.2a", 1));

    // Query with no catalog candidate: explicit no-match signal.
    let outcome = search("a tense conversation", &catalog, &corpus, 5);
    assert!(matches!(outcome, SearchOutcome::NoTagsMatched));
}
