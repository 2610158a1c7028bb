mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod error;
mod model;
mod utils;
mod vectorizer;

pub use builder::ClassifierBuilder;
pub use classifier::Classifier;
pub use error::ClassifierError;
pub use model::{LogisticArtifact, OneVsRestLogistic, ProbabilityModel};
pub use vectorizer::{Norm, TextVectorizer, TfidfArtifact, TfidfVectorizer, DEFAULT_TOKEN_PATTERN};

/// Label set the bundled news model was fitted with, in output order.
pub const DEFAULT_LABELS: [&str; 4] = [
    "comp.graphics",
    "rec.sport.baseball",
    "sci.space",
    "talk.politics.mideast",
];

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassifierInfo {
    /// Path to the model artifact, when loaded from disk
    pub model_path: Option<String>,
    /// Path to the vectorizer artifact, when loaded from disk
    pub vectorizer_path: Option<String>,
    /// Number of labels the classifier scores
    pub num_labels: usize,
    /// Labels in output order
    pub labels: Vec<String>,
    /// Width of the feature vectors
    pub n_features: usize,
}
