use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use newsclass::web::{self, AppState, EXAMPLE_TEXTS};
use newsclass::{predict_multilabel, AppConfig, Classifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = AppConfig::parse();

    info!("=== Starting Multi-label News Classifier ===");
    info!("Model artifact: {:?}", config.model_path);
    info!("Vectorizer artifact: {:?}", config.vectorizer_path);

    let start_time = Instant::now();
    let classifier = match config.load_classifier() {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Failed to load classifier artifacts: {}", e);
            return Err(e).context("classifier artifacts could not be loaded");
        }
    };
    info!(
        "Classifier ready with {} labels (took {:.2?})",
        classifier.labels().len(),
        start_time.elapsed()
    );

    if config.demo {
        return run_demo(&classifier);
    }

    let addr = config.socket_addr().context("could not resolve HOST/PORT")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let state = AppState::new(Arc::new(classifier), config.max_concurrency as usize);
    web::serve(listener, state).await?;

    info!("=== Server stopped ===");
    Ok(())
}

fn run_demo(classifier: &Classifier) -> anyhow::Result<()> {
    info!("=== Running Classifications ({} inputs) ===", EXAMPLE_TEXTS.len());
    let classify_start = Instant::now();

    for (i, text) in EXAMPLE_TEXTS.iter().enumerate() {
        info!("Test {}/{}: {}", i + 1, EXAMPLE_TEXTS.len(), text);
        let prediction = predict_multilabel(classifier, text, 0.5)?;

        println!("\nInput: {}", text);
        println!("  {}", prediction.summary);
        for row in &prediction.table {
            println!("    {:<24} {:.1}%", row.label, row.probability * 100.0);
        }
    }

    let classify_time = classify_start.elapsed();
    info!("=== Demo Complete ===");
    info!("Classification time: {:.2?}", classify_time);
    info!(
        "Average time per classification: {:.2?}",
        classify_time / EXAMPLE_TEXTS.len() as u32
    );
    Ok(())
}
