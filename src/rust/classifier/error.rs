use thiserror::Error;

use crate::artifacts::ArtifactError;

/// Represents the different types of errors that can occur in the news classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A model or vectorizer artifact could not be read, verified or parsed
    #[error("Artifact error: {0}")]
    ArtifactError(#[from] ArtifactError),
    /// Error occurred during the build phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred while turning text into features
    #[error("Vectorizer error: {0}")]
    VectorizerError(String),
    /// The frozen model state is inconsistent
    #[error("Model error: {0}")]
    ModelError(String),
    /// Error occurred while making predictions
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ClassifierError {
    /// True when the caller supplied bad input, as opposed to a failure inside the model.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = ClassifierError::ValidationError("threshold out of range".into());
        assert_eq!(err.to_string(), "Validation error: threshold out of range");
        assert!(err.is_validation());

        let err = ClassifierError::PredictionError("NaN".into());
        assert_eq!(err.to_string(), "Prediction error: NaN");
        assert!(!err.is_validation());
    }
}
