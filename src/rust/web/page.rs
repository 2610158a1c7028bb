//! Server-rendered HTML for the classifier form.

use serde::Serialize;

use crate::chart::escape_xml;
use crate::prediction::{Prediction, DEFAULT_THRESHOLD};

pub const TITLE: &str = "Multi-label News Classifier (Pro)";
pub const DESCRIPTION: &str = "Enter a news snippet. The model predicts multiple categories with probabilities. \
     Adjust the threshold to control which labels become active.";

pub const THRESHOLD_MIN: f64 = 0.10;
pub const THRESHOLD_MAX: f64 = 0.90;
pub const THRESHOLD_STEP: f64 = 0.05;

/// Example inputs offered under the form.
pub const EXAMPLE_TEXTS: [&str; 7] = [
    "NASA announces a new lunar mission with satellite support",
    "The baseball team celebrated their championship win yesterday",
    "Advances in computer graphics make video games more realistic",
    "Political leaders met in the Middle East to discuss peace",
    "Scientists discovered a new black hole in deep space",
    "Fans are excited about the upcoming baseball season",
    "3D rendering and visualization are core topics in computer graphics",
];

/// An example input with the threshold it is shown with.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleInput {
    pub text: &'static str,
    pub threshold: f64,
}

pub fn examples() -> Vec<ExampleInput> {
    EXAMPLE_TEXTS
        .iter()
        .map(|text| ExampleInput {
            text,
            threshold: DEFAULT_THRESHOLD,
        })
        .collect()
}

/// What the page shows below the form.
#[derive(Debug)]
pub enum Outcome<'a> {
    Nothing,
    Prediction(&'a Prediction),
    Error(&'a str),
}

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:2em auto;padding:0 1em;color:#222}\
textarea{width:100%;box-sizing:border-box}\
label{display:block;font-weight:bold;margin:1em 0 .3em}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.3em .6em;text-align:left}\
.summary{padding:.6em;border:1px solid #ccc;background:#f7f7f7}\
.error{padding:.6em;border:1px solid #d33;background:#fdecec;color:#900}\
.examples button{display:block;width:100%;text-align:left;margin:.2em 0}";

/// Renders the whole page: form pre-filled with `text` and `threshold`, then the outcome.
pub fn render_page(text: &str, threshold: f64, outcome: Outcome<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title><style>{}</style></head><body>", escape_xml(TITLE), STYLE));
    html.push_str(&format!("<h1>{}</h1><p>{}</p>", escape_xml(TITLE), escape_xml(DESCRIPTION)));

    html.push_str(&render_form(text, threshold));

    match outcome {
        Outcome::Nothing => {}
        Outcome::Prediction(prediction) => html.push_str(&render_prediction(prediction)),
        Outcome::Error(message) => html.push_str(&format!(
            "<div class=\"error\" role=\"alert\"><strong>Error:</strong> {}</div>",
            escape_xml(message)
        )),
    }

    html.push_str(&render_examples());
    html.push_str("</body></html>");
    html
}

fn render_form(text: &str, threshold: f64) -> String {
    format!(
        "<form method=\"post\" action=\"/\">\
<label for=\"text\">News text</label>\
<textarea id=\"text\" name=\"text\" rows=\"6\" placeholder=\"Paste a news snippet...\">{text}</textarea>\
<label for=\"threshold\">Threshold: <output id=\"threshold-value\">{value:.2}</output></label>\
<input type=\"range\" id=\"threshold\" name=\"threshold\" min=\"{min:.2}\" max=\"{max:.2}\" step=\"{step:.2}\" value=\"{value:.2}\" \
oninput=\"document.getElementById('threshold-value').value=Number(this.value).toFixed(2)\">\
<p><button type=\"submit\">Submit</button></p></form>",
        text = escape_xml(text),
        value = threshold,
        min = THRESHOLD_MIN,
        max = THRESHOLD_MAX,
        step = THRESHOLD_STEP,
    )
}

fn render_prediction(prediction: &Prediction) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<label>Predicted Labels</label><div class=\"summary\" id=\"summary\">{}</div>",
        escape_xml(&prediction.summary)
    ));

    html.push_str("<label>Sorted probabilities</label><table><thead><tr><th>label</th><th>probability</th></tr></thead><tbody>");
    for row in &prediction.table {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.4}</td></tr>",
            escape_xml(&row.label),
            row.probability
        ));
    }
    html.push_str("</tbody></table>");

    html.push_str("<label>Probability chart</label>");
    html.push_str(&prediction.chart.to_svg());
    html
}

fn render_examples() -> String {
    let mut html = String::from("<h2>Examples</h2><div class=\"examples\">");
    for example in examples() {
        html.push_str(&format!(
            "<form method=\"post\" action=\"/\">\
<input type=\"hidden\" name=\"text\" value=\"{text}\">\
<input type=\"hidden\" name=\"threshold\" value=\"{threshold:.2}\">\
<button type=\"submit\">{text} ({threshold:.2})</button></form>",
            text = escape_xml(example.text),
            threshold = example.threshold,
        ));
    }
    html.push_str("</div>");
    html
}
