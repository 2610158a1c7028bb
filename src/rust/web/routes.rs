use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::page::{self, ExampleInput, Outcome};
use super::AppState;
use crate::prediction::{predict_multilabel, Prediction, DEFAULT_THRESHOLD};

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Body of `POST /` and `POST /api/predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// JSON prediction plus the rendered chart.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub chart_svg: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub labels: Vec<String>,
}

/// Runs one inference off the async workers, waiting for a queue slot first.
///
/// A panic inside inference is reported as an error for this request only.
pub(crate) async fn run_inference(
    state: &AppState,
    text: String,
    threshold: f64,
) -> Result<Prediction, ApiError> {
    let _permit = Arc::clone(&state.queue)
        .acquire_owned()
        .await
        .map_err(|e| ApiError::internal(format!("Request queue closed: {}", e)))?;

    let classifier = Arc::clone(&state.classifier);
    let started = Instant::now();
    let chars = text.chars().count();
    let result = tokio::task::spawn_blocking(move || predict_multilabel(&classifier, &text, threshold))
        .await
        .map_err(|e| ApiError::internal(format!("Inference task failed: {}", e)))?;

    match &result {
        Ok(prediction) => log::info!(
            "Classified {} chars at thr={:.2} in {:.2?}: {:?}",
            chars,
            threshold,
            started.elapsed(),
            prediction.active
        ),
        Err(e) => log::warn!("Classification failed after {:.2?}: {}", started.elapsed(), e),
    }
    result.map_err(ApiError::from)
}

/// GET /
pub async fn index() -> Html<String> {
    Html(page::render_page("", DEFAULT_THRESHOLD, Outcome::Nothing))
}

/// POST /
///
/// Always answers with the page; failures show up as an error banner,
/// including a form body that does not parse.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<PredictRequest>, FormRejection>,
) -> Html<String> {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected form submission: {}", rejection.body_text());
            return Html(page::render_page(
                "",
                DEFAULT_THRESHOLD,
                Outcome::Error(&rejection.body_text()),
            ));
        }
    };
    let text = request.text.clone();
    match run_inference(&state, request.text, request.threshold).await {
        Ok(prediction) => Html(page::render_page(
            &text,
            request.threshold,
            Outcome::Prediction(&prediction),
        )),
        Err(e) => Html(page::render_page(&text, request.threshold, Outcome::Error(e.message()))),
    }
}

/// POST /api/predict
pub async fn api_predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let prediction = run_inference(&state, request.text, request.threshold).await?;
    let chart_svg = prediction.chart.to_svg();
    Ok(Json(PredictResponse {
        prediction,
        chart_svg,
    }))
}

/// GET /api/examples
pub async fn api_examples() -> Json<Vec<ExampleInput>> {
    Json(page::examples())
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        labels: state.classifier.labels().to_vec(),
    })
}
