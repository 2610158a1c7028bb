//! The inference function: text and threshold in; summary, ranked table and
//! chart out.
//!
//! The ranking and threshold policy live in small pure functions so they can
//! be exercised without a model.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::chart::{BarChart, EMPTY_FIGURE_SIZE, FIGURE_SIZE};
use crate::classifier::{Classifier, ClassifierError};

/// Summary returned for empty or whitespace-only input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text.";
/// Threshold used when a request does not specify one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A label paired with its predicted probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelProbability {
    pub label: String,
    pub probability: f64,
}

impl LabelProbability {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Everything the UI renders for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Human-readable list of active labels.
    pub summary: String,
    pub threshold: f64,
    /// Labels at or above the threshold, in ranked order. Never empty for
    /// non-empty input.
    pub active: Vec<String>,
    /// Probabilities sorted high to low; ties keep label order.
    pub table: Vec<LabelProbability>,
    pub chart: BarChart,
}

/// Pairs labels with their probabilities and sorts high to low.
///
/// The sort is stable, so equal probabilities keep their original label order.
pub fn rank_probabilities(labels: &[String], probabilities: &[f64]) -> Vec<LabelProbability> {
    let mut ranked: Vec<LabelProbability> = labels
        .iter()
        .zip(probabilities)
        .map(|(label, &p)| LabelProbability::new(label.clone(), p))
        .collect();
    ranked.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap_or(Ordering::Equal));
    ranked
}

/// Labels whose probability is at least `threshold`, taken from a ranked table.
///
/// When nothing passes, the single top-ranked label is returned instead, so a
/// non-empty table always yields at least one label.
pub fn active_labels(ranked: &[LabelProbability], threshold: f64) -> Vec<String> {
    let active: Vec<String> = ranked
        .iter()
        .filter(|entry| entry.probability >= threshold)
        .map(|entry| entry.label.clone())
        .collect();

    if active.is_empty() {
        ranked.first().map(|top| vec![top.label.clone()]).unwrap_or_default()
    } else {
        active
    }
}

/// `Predicted labels (thr=0.50): a, b`
pub fn format_summary(threshold: f64, active: &[String]) -> String {
    format!("Predicted labels (thr={:.2}): {}", threshold, active.join(", "))
}

/// Placeholder response for empty input: zero probabilities in label order.
pub fn empty_prediction(labels: &[String], threshold: f64) -> Prediction {
    let table: Vec<LabelProbability> = labels
        .iter()
        .map(|label| LabelProbability::new(label.clone(), 0.0))
        .collect();

    Prediction {
        summary: EMPTY_INPUT_MESSAGE.to_string(),
        threshold,
        active: Vec::new(),
        chart: BarChart::probabilities(table.clone(), EMPTY_FIGURE_SIZE),
        table,
    }
}

/// Checks that a threshold is a finite value in `[0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<(), ClassifierError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ClassifierError::ValidationError(format!(
            "Threshold must be between 0 and 1, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Classifies `text` and applies the threshold-with-fallback policy.
///
/// Empty or whitespace-only text short-circuits to [`empty_prediction`]
/// without touching the model.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use newsclass::{predict_multilabel, Classifier};
///
/// let classifier = Classifier::builder()
///     .with_model_path("model_multi.json", None)?
///     .with_vectorizer_path("tfidf.json", None)?
///     .build()?;
///
/// let prediction = predict_multilabel(&classifier, "NASA plans a lunar mission", 0.5)?;
/// println!("{}", prediction.summary);
/// for row in &prediction.table {
///     println!("{}: {:.3}", row.label, row.probability);
/// }
/// # Ok(())
/// # }
/// ```
pub fn predict_multilabel(
    classifier: &Classifier,
    text: &str,
    threshold: f64,
) -> Result<Prediction, ClassifierError> {
    validate_threshold(threshold)?;

    if text.trim().is_empty() {
        return Ok(empty_prediction(classifier.labels(), threshold));
    }

    let proba = classifier.predict_proba(text)?;
    let table = rank_probabilities(classifier.labels(), &proba.to_vec());
    let active = active_labels(&table, threshold);
    log::debug!("Active labels at threshold {:.2}: {:?}", threshold, active);

    Ok(Prediction {
        summary: format_summary(threshold, &active),
        threshold,
        active,
        chart: BarChart::probabilities(table.clone(), FIGURE_SIZE),
        table,
    })
}
