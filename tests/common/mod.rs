#![allow(dead_code)]

use newsclass::Classifier;

pub const MODEL_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/model_multi.json");
pub const VECTORIZER_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tfidf.json");

pub const LABELS: [&str; 4] = [
    "comp.graphics",
    "rec.sport.baseball",
    "sci.space",
    "talk.politics.mideast",
];

pub fn setup_test_classifier() -> Classifier {
    Classifier::builder()
        .with_vectorizer_path(VECTORIZER_FIXTURE, None)
        .unwrap()
        .with_model_path(MODEL_FIXTURE, None)
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}
