use std::fmt;
use std::sync::Arc;

use ndarray::Array1;

use super::error::ClassifierError;
use super::model::ProbabilityModel;
use super::vectorizer::TextVectorizer;

/// A thread-safe multi-label text classifier: a frozen vectorizer feeding a
/// frozen probability model, with the label set the outputs are aligned to.
///
/// # Thread Safety
///
/// Every field is immutable after [`super::ClassifierBuilder::build`] and the
/// collaborators sit behind `Arc<dyn ... + Send + Sync>`, so one instance can
/// be shared across threads and requests:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use newsclass::Classifier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_model_path("model_multi.json", None)?
///     .with_vectorizer_path("tfidf.json", None)?
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.predict_proba("NASA launches a new satellite").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
pub struct Classifier {
    pub(super) model_path: Option<String>,
    pub(super) vectorizer_path: Option<String>,
    pub(super) vectorizer: Arc<dyn TextVectorizer>,
    pub(super) model: Arc<dyn ProbabilityModel>,
    pub(super) labels: Arc<[String]>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("model_path", &self.model_path)
            .field("vectorizer_path", &self.vectorizer_path)
            .field("labels", &self.labels)
            .field("n_features", &self.model.n_features())
            .finish()
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            vectorizer_path: self.vectorizer_path.clone(),
            num_labels: self.labels.len(),
            labels: self.labels.to_vec(),
            n_features: self.model.n_features(),
        }
    }

    /// The label set, in the order probability outputs are aligned to.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Vectorizes `text` and returns one probability per label, in label order.
    ///
    /// # Errors
    /// - `ValidationError` if the text is empty
    /// - `VectorizerError` / `PredictionError` from the frozen collaborators
    /// - `PredictionError` if the model returns the wrong number of values or
    ///   anything outside `[0, 1]` (including NaN)
    pub fn predict_proba(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        if text.is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let features = self.vectorizer.transform(text)?;
        let proba = self.model.predict_proba(&features)?;

        if proba.len() != self.labels.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model returned {} probabilities for {} labels",
                proba.len(),
                self.labels.len()
            )));
        }
        if let Some(pos) = proba.iter().position(|p| !(0.0..=1.0).contains(p)) {
            return Err(ClassifierError::PredictionError(format!(
                "Model returned an invalid probability {} for label '{}'",
                proba[pos], self.labels[pos]
            )));
        }

        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct FixedVectorizer;

    impl TextVectorizer for FixedVectorizer {
        fn transform(&self, _text: &str) -> Result<Array1<f64>, ClassifierError> {
            Ok(array![1.0])
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    struct FixedModel(Array1<f64>);

    impl ProbabilityModel for FixedModel {
        fn predict_proba(&self, _features: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
            Ok(self.0.clone())
        }

        fn n_features(&self) -> usize {
            1
        }

        fn n_labels(&self) -> usize {
            2
        }
    }

    fn classifier_returning(proba: Array1<f64>) -> Classifier {
        Classifier::builder()
            .with_vectorizer(FixedVectorizer)
            .unwrap()
            .with_model(FixedModel(proba))
            .unwrap()
            .with_labels(vec!["x", "y"])
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_class_info() {
        let classifier = classifier_returning(array![0.2, 0.9]);
        let info = classifier.info();
        assert_eq!(info.num_labels, 2);
        assert_eq!(info.labels, vec!["x", "y"]);
        assert_eq!(info.n_features, 1);
        assert!(info.model_path.is_none());
    }

    #[test]
    fn test_predict_proba_passes_valid_output() {
        let classifier = classifier_returning(array![0.2, 0.9]);
        assert_eq!(classifier.predict_proba("text").unwrap(), array![0.2, 0.9]);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let classifier = classifier_returning(array![0.2, 0.9]);
        assert!(classifier.predict_proba("").unwrap_err().is_validation());
    }

    #[test]
    fn test_nan_and_out_of_range_outputs_are_rejected() {
        let classifier = classifier_returning(array![f64::NAN, 0.5]);
        let err = classifier.predict_proba("text").unwrap_err();
        assert!(matches!(err, ClassifierError::PredictionError(_)));

        let classifier = classifier_returning(array![1.5, 0.5]);
        assert!(classifier.predict_proba("text").is_err());
    }

    #[test]
    fn test_wrong_output_length_is_rejected() {
        let classifier = classifier_returning(array![0.5]);
        let err = classifier.predict_proba("text").unwrap_err();
        assert!(err.to_string().contains("1 probabilities for 2 labels"));
    }
}
