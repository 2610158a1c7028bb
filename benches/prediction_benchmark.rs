use criterion::{black_box, criterion_group, criterion_main, Criterion};
use newsclass::{predict_multilabel, Classifier, TextVectorizer};

const MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/model_multi.json");
const VECTORIZER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tfidf.json");

const SHORT_TEXT: &str = "NASA announces a new lunar mission";
const MEDIUM_TEXT: &str = "NASA announces a new lunar mission with satellite support. \
     The baseball team celebrated their championship win yesterday while political \
     leaders met in the Middle East to discuss peace.";

fn setup_benchmark_classifier() -> Classifier {
    Classifier::builder()
        .with_vectorizer_path(VECTORIZER, None)
        .unwrap()
        .with_model_path(MODEL, None)
        .unwrap()
        .build()
        .unwrap()
}

fn long_text() -> String {
    MEDIUM_TEXT.repeat(20)
}

fn bench_vectorization(c: &mut Criterion) {
    let vectorizer = newsclass::TfidfVectorizer::load(VECTORIZER, None).unwrap();
    let long = long_text();
    let mut group = c.benchmark_group("Vectorization");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| {
        b.iter(|| vectorizer.transform(black_box(SHORT_TEXT)).unwrap())
    });
    group.bench_function("medium_text", |b| {
        b.iter(|| vectorizer.transform(black_box(MEDIUM_TEXT)).unwrap())
    });
    group.bench_function("long_text", |b| {
        b.iter(|| vectorizer.transform(black_box(&long)).unwrap())
    });

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier();
    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for threshold in [0.1, 0.5, 0.9] {
        group.bench_function(format!("predict_thr_{:.1}", threshold), |b| {
            b.iter(|| predict_multilabel(&classifier, black_box(MEDIUM_TEXT), threshold).unwrap())
        });
    }
    group.bench_function("empty_input", |b| {
        b.iter(|| predict_multilabel(&classifier, black_box("   "), 0.5).unwrap())
    });

    group.finish();
}

fn bench_chart(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier();
    let prediction = predict_multilabel(&classifier, MEDIUM_TEXT, 0.5).unwrap();
    c.bench_function("chart_svg", |b| b.iter(|| black_box(&prediction.chart).to_svg()));
}

criterion_group!(benches, bench_vectorization, bench_prediction, bench_chart);
criterion_main!(benches);
