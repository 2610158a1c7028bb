use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::sigmoid;
use crate::artifacts::{load_artifact, ArtifactKind};

/// Maps a feature vector to one probability per label.
///
/// Outputs are positionally aligned to the label set the model was fitted with.
pub trait ProbabilityModel: Send + Sync {
    /// Returns one probability per label for a single feature vector.
    fn predict_proba(&self, features: &Array1<f64>) -> Result<Array1<f64>, ClassifierError>;

    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    /// Number of labels (outputs) the model produces.
    fn n_labels(&self) -> usize;

    /// Label names stored alongside the fitted model, if any.
    fn classes(&self) -> Option<&[String]> {
        None
    }
}

fn default_multilabel() -> bool {
    true
}

/// On-disk form of a fitted one-vs-rest logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    /// One row of coefficients per label.
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Independent per-label probabilities when true; otherwise each row is
    /// rescaled to sum to one.
    #[serde(default = "default_multilabel")]
    pub multilabel: bool,
}

/// One binary logistic regression per label, evaluated together.
#[derive(Debug, Clone)]
pub struct OneVsRestLogistic {
    classes: Option<Vec<String>>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
    multilabel: bool,
}

impl OneVsRestLogistic {
    /// Loads a model artifact from disk, optionally pinned to a SHA-256 digest.
    pub fn load(path: impl AsRef<Path>, expected_sha256: Option<&str>) -> Result<Self, ClassifierError> {
        let artifact: LogisticArtifact = load_artifact(ArtifactKind::Model, path.as_ref(), expected_sha256)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, ClassifierError> {
        let n_labels = artifact.coef.len();
        if n_labels == 0 {
            return Err(ClassifierError::ModelError("Model has no estimators".into()));
        }
        if artifact.intercept.len() != n_labels {
            return Err(ClassifierError::ModelError(format!(
                "Model has {} coefficient rows but {} intercepts",
                n_labels,
                artifact.intercept.len()
            )));
        }

        let n_features = artifact.coef[0].len();
        if n_features == 0 {
            return Err(ClassifierError::ModelError("Coefficient rows cannot be empty".into()));
        }
        if let Some(row) = artifact.coef.iter().position(|r| r.len() != n_features) {
            return Err(ClassifierError::ModelError(format!(
                "Coefficient row {} has {} values, expected {}",
                row,
                artifact.coef[row].len(),
                n_features
            )));
        }
        let all_finite = artifact.coef.iter().flatten().chain(&artifact.intercept).all(|v| v.is_finite());
        if !all_finite {
            return Err(ClassifierError::ModelError("Model parameters must be finite".into()));
        }
        if let Some(classes) = &artifact.classes {
            if classes.len() != n_labels {
                return Err(ClassifierError::ModelError(format!(
                    "Model names {} classes but has {} estimators",
                    classes.len(),
                    n_labels
                )));
            }
        }

        let coef = Array2::from_shape_vec(
            (n_labels, n_features),
            artifact.coef.into_iter().flatten().collect(),
        )
        .map_err(|e| ClassifierError::ModelError(format!("Failed to create coefficient matrix: {}", e)))?;

        log::info!(
            "One-vs-rest model ready: {} labels x {} features (multilabel: {})",
            n_labels,
            n_features,
            artifact.multilabel
        );

        Ok(Self {
            classes: artifact.classes,
            coef,
            intercept: Array1::from(artifact.intercept),
            multilabel: artifact.multilabel,
        })
    }

    /// Raw per-label scores `coef · x + intercept`.
    pub fn decision_function(&self, features: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
        if features.len() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }
        Ok(self.coef.dot(features) + &self.intercept)
    }
}

impl ProbabilityModel for OneVsRestLogistic {
    fn predict_proba(&self, features: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
        let mut proba = self.decision_function(features)?.mapv(sigmoid);
        if !self.multilabel {
            let total = proba.sum();
            if total > 0.0 {
                proba /= total;
            } else {
                proba.fill(1.0 / proba.len() as f64);
            }
        }
        Ok(proba)
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn n_labels(&self) -> usize {
        self.coef.nrows()
    }

    fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }
}
