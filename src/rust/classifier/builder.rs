use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::model::{OneVsRestLogistic, ProbabilityModel};
use super::vectorizer::{TextVectorizer, TfidfVectorizer};
use super::DEFAULT_LABELS;

/// A builder for constructing a Classifier with a fluent interface.
///
/// Loading is fail-fast: a missing, corrupt or mismatched artifact is reported
/// by the step that loads it, and [`ClassifierBuilder::build`] checks that the
/// vectorizer, model and label set agree with each other.
#[derive(Default)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    vectorizer_path: Option<String>,
    vectorizer: Option<Arc<dyn TextVectorizer>>,
    model: Option<Arc<dyn ProbabilityModel>>,
    labels: Option<Vec<String>>,
}

impl fmt::Debug for ClassifierBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierBuilder")
            .field("model_path", &self.model_path)
            .field("vectorizer_path", &self.vectorizer_path)
            .field("has_vectorizer", &self.vectorizer.is_some())
            .field("has_model", &self.model.is_some())
            .field("labels", &self.labels)
            .finish()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance
    ///
    /// # Example
    /// ```
    /// use newsclass::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the TF-IDF vectorizer artifact at `path`.
    ///
    /// # Arguments
    /// * `path` - Path to the vectorizer JSON artifact
    /// * `expected_sha256` - Optional hex digest the file must match
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - A vectorizer is already set
    ///   - The file is missing, fails its checksum or cannot be parsed
    ///   - The fitted state is inconsistent
    pub fn with_vectorizer_path(
        mut self,
        path: impl AsRef<Path>,
        expected_sha256: Option<&str>,
    ) -> Result<Self, ClassifierError> {
        if self.vectorizer.is_some() {
            return Err(ClassifierError::BuildError("Vectorizer already set".to_string()));
        }
        let path = path.as_ref();
        let vectorizer = TfidfVectorizer::load(path, expected_sha256)?;
        info!("Vectorizer loaded successfully from {:?}", path);

        self.vectorizer_path = Some(path.to_string_lossy().to_string());
        self.vectorizer = Some(Arc::new(vectorizer));
        Ok(self)
    }

    /// Loads the one-vs-rest logistic model artifact at `path`.
    ///
    /// # Arguments
    /// * `path` - Path to the model JSON artifact
    /// * `expected_sha256` - Optional hex digest the file must match
    pub fn with_model_path(
        mut self,
        path: impl AsRef<Path>,
        expected_sha256: Option<&str>,
    ) -> Result<Self, ClassifierError> {
        if self.model.is_some() {
            return Err(ClassifierError::BuildError("Model already set".to_string()));
        }
        let path = path.as_ref();
        let model = OneVsRestLogistic::load(path, expected_sha256)?;
        info!("Model loaded successfully from {:?}", path);

        self.model_path = Some(path.to_string_lossy().to_string());
        self.model = Some(Arc::new(model));
        Ok(self)
    }

    /// Uses an already constructed vectorizer.
    pub fn with_vectorizer(mut self, vectorizer: impl TextVectorizer + 'static) -> Result<Self, ClassifierError> {
        if self.vectorizer.is_some() {
            return Err(ClassifierError::BuildError("Vectorizer already set".to_string()));
        }
        self.vectorizer = Some(Arc::new(vectorizer));
        Ok(self)
    }

    /// Uses an already constructed probability model.
    pub fn with_model(mut self, model: impl ProbabilityModel + 'static) -> Result<Self, ClassifierError> {
        if self.model.is_some() {
            return Err(ClassifierError::BuildError("Model already set".to_string()));
        }
        self.model = Some(Arc::new(model));
        Ok(self)
    }

    /// Sets the label set explicitly, in the order the model's outputs follow.
    ///
    /// Without this, the labels stored in the model artifact are used, and
    /// failing that the built-in news label set.
    ///
    /// # Example
    /// ```
    /// use newsclass::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_labels(vec!["comp.graphics", "sci.space"]);
    /// assert!(builder.is_ok());
    /// ```
    pub fn with_labels(mut self, labels: Vec<impl Into<String>>) -> Result<Self, ClassifierError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self::validate_labels(&labels)?;
        self.labels = Some(labels);
        Ok(self)
    }

    fn validate_labels(labels: &[String]) -> Result<(), ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::ValidationError("Label set cannot be empty".into()));
        }
        if let Some(pos) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!("Label {} cannot be empty", pos + 1)));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(ClassifierError::ValidationError(format!("Duplicate label '{}'", dup)));
        }
        Ok(())
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - The vectorizer or model is missing
    ///   - The label count differs from the number of model outputs
    ///   - The vectorizer and model disagree on the feature width
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| ClassifierError::BuildError("No vectorizer loaded".into()))?;
        let model = self
            .model
            .ok_or_else(|| ClassifierError::BuildError("No model loaded".into()))?;

        let labels = match (self.labels, model.classes()) {
            (Some(explicit), Some(stored)) => {
                if explicit.as_slice() != stored {
                    warn!("Explicit labels {:?} override the model's classes {:?}", explicit, stored);
                }
                explicit
            }
            (Some(explicit), None) => explicit,
            (None, Some(stored)) => stored.to_vec(),
            (None, None) => DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        };
        Self::validate_labels(&labels)
            .map_err(|e| ClassifierError::BuildError(e.to_string()))?;

        if labels.len() != model.n_labels() {
            return Err(ClassifierError::BuildError(format!(
                "Label set has {} labels but the model produces {} outputs",
                labels.len(),
                model.n_labels()
            )));
        }
        if vectorizer.n_features() != model.n_features() {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer produces {} features but the model expects {}",
                vectorizer.n_features(),
                model.n_features()
            )));
        }

        info!("Classifier built with labels {:?}", labels);

        Ok(Classifier {
            model_path: self.model_path,
            vectorizer_path: self.vectorizer_path,
            vectorizer,
            model,
            labels: labels.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::model::LogisticArtifact;
    use crate::classifier::vectorizer::{Norm, TfidfArtifact};

    fn vectorizer(terms: usize) -> TfidfVectorizer {
        TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary: (0..terms).map(|i| (format!("term{}", i), i)).collect(),
            idf: vec![1.0; terms],
            lowercase: true,
            token_pattern: None,
            ngram_range: (1, 1),
            stop_words: None,
            sublinear_tf: false,
            use_idf: true,
            norm: Some(Norm::L2),
        })
        .unwrap()
    }

    fn model(labels: usize, features: usize, classes: Option<Vec<String>>) -> OneVsRestLogistic {
        OneVsRestLogistic::from_artifact(LogisticArtifact {
            classes,
            coef: vec![vec![0.0; features]; labels],
            intercept: vec![0.0; labels],
            multilabel: true,
        })
        .unwrap()
    }

    #[test]
    fn test_default_labels_when_model_has_none() {
        let classifier = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(3))
            .unwrap()
            .with_model(model(4, 3, None))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(classifier.labels(), DEFAULT_LABELS);
    }

    #[test]
    fn test_model_classes_are_used() {
        let classifier = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(2))
            .unwrap()
            .with_model(model(2, 2, Some(vec!["a".into(), "b".into()])))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(classifier.labels(), ["a", "b"]);
    }

    #[test]
    fn test_explicit_labels_win() {
        let classifier = ClassifierBuilder::new()
            .with_labels(vec!["x", "y"])
            .unwrap()
            .with_vectorizer(vectorizer(2))
            .unwrap()
            .with_model(model(2, 2, Some(vec!["a".into(), "b".into()])))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(classifier.labels(), ["x", "y"]);
    }

    #[test]
    fn test_label_validation() {
        assert!(ClassifierBuilder::new().with_labels(Vec::<String>::new()).is_err());
        assert!(ClassifierBuilder::new().with_labels(vec!["a", " "]).is_err());
        assert!(ClassifierBuilder::new().with_labels(vec!["a", "a"]).is_err());
    }

    #[test]
    fn test_label_count_mismatch() {
        let result = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(2))
            .unwrap()
            .with_model(model(3, 2, None))
            .unwrap()
            .build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_feature_width_mismatch() {
        let result = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(5))
            .unwrap()
            .with_model(model(4, 2, None))
            .unwrap()
            .build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_missing_parts() {
        assert!(ClassifierBuilder::new().build().is_err());
        assert!(ClassifierBuilder::new()
            .with_vectorizer(vectorizer(1))
            .unwrap()
            .build()
            .is_err());
    }

    #[test]
    fn test_duplicate_vectorizer() {
        let result = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(1))
            .unwrap()
            .with_vectorizer(vectorizer(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_artifact_file() {
        let result = ClassifierBuilder::new().with_model_path("/no/such/model_multi.json", None);
        assert!(matches!(result, Err(ClassifierError::ArtifactError(_))));
    }
}
