//! A multi-label news classifier served through a small web UI.
//!
//! A frozen TF-IDF vectorizer and a frozen one-vs-rest logistic regression are
//! loaded once at startup. Each request turns text into per-label
//! probabilities, ranks them, applies a threshold (falling back to the top
//! label when nothing passes) and describes a bar chart.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use newsclass::{predict_multilabel, Classifier};
//!
//! let classifier = Classifier::builder()
//!     .with_vectorizer_path("tfidf.json", None)?
//!     .with_model_path("model_multi.json", None)?
//!     .build()?;
//!
//! let prediction = predict_multilabel(
//!     &classifier,
//!     "NASA announces a new lunar mission with satellite support",
//!     0.5,
//! )?;
//! println!("{}", prediction.summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`Classifier`] is immutable once built. Wrap it in an `Arc` and share it;
//! the web shell does exactly that across requests.

pub mod artifacts;
pub mod chart;
pub mod classifier;
pub mod config;
pub mod prediction;
pub mod web;

pub use artifacts::{ArtifactError, ArtifactKind};
pub use chart::BarChart;
pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, OneVsRestLogistic, ProbabilityModel,
    TextVectorizer, TfidfVectorizer, DEFAULT_LABELS,
};
pub use config::AppConfig;
pub use prediction::{
    active_labels, predict_multilabel, rank_probabilities, LabelProbability, Prediction, EMPTY_INPUT_MESSAGE,
};

pub fn init_logger() {
    env_logger::init();
}
