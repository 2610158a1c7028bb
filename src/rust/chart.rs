//! Chart descriptor for per-label probabilities and its SVG rendering.
//!
//! The descriptor is plain data so it can be serialized next to the table;
//! [`BarChart::to_svg`] turns it into a self-contained horizontal bar chart.

use serde::Serialize;

use crate::prediction::LabelProbability;

pub const CHART_TITLE: &str = "Class probabilities";
pub const X_AXIS_LABEL: &str = "Probability";
/// Figure size in inches for a scored prediction.
pub const FIGURE_SIZE: (f64, f64) = (6.0, 3.5);
/// Figure size in inches for the empty-input placeholder.
pub const EMPTY_FIGURE_SIZE: (f64, f64) = (6.0, 3.2);

const DPI: f64 = 100.0;
const TICKS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
const BAR_FILL: &str = "#1f77b4";

/// Horizontal bar chart, one bar per label. The first bar is drawn at the top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub x_range: (f64, f64),
    /// Width and height in inches.
    pub figure_size: (f64, f64),
    pub bars: Vec<LabelProbability>,
}

impl BarChart {
    /// Probability chart over `[0, 1]` with the standard title and axis label.
    pub fn probabilities(bars: Vec<LabelProbability>, figure_size: (f64, f64)) -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            x_range: (0.0, 1.0),
            figure_size,
            bars,
        }
    }

    /// Renders the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let width = (self.figure_size.0 * DPI).round();
        let height = (self.figure_size.1 * DPI).round();

        let longest_label = self.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        let left = 16.0 + longest_label as f64 * 7.0;
        let right = 20.0;
        let top = 34.0;
        let bottom = 48.0;
        let plot_w = (width - left - right).max(1.0);
        let plot_h = (height - top - bottom).max(1.0);

        let (x_min, x_max) = self.x_range;
        let span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let x_of = |v: f64| left + ((v.clamp(x_min, x_max) - x_min) / span) * plot_w;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = width,
            h = height
        ));
        svg.push_str(&format!(r#"<rect width="{}" height="{}" fill="white"/>"#, width, height));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="20" text-anchor="middle" font-size="14">{}</text>"#,
            left + plot_w / 2.0,
            escape_xml(&self.title)
        ));

        for tick in TICKS.iter().filter(|t| (x_min..=x_max).contains(*t)) {
            let x = x_of(*tick);
            svg.push_str(&format!(
                r##"<line x1="{x:.1}" y1="{t:.1}" x2="{x:.1}" y2="{b:.1}" stroke="#dddddd"/>"##,
                x = x,
                t = top,
                b = top + plot_h
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{:.1}</text>"#,
                x,
                top + plot_h + 16.0,
                tick
            ));
        }

        if !self.bars.is_empty() {
            let band = plot_h / self.bars.len() as f64;
            for (i, bar) in self.bars.iter().enumerate() {
                let y = top + i as f64 * band;
                let bar_w = x_of(bar.probability) - left;
                svg.push_str(&format!(
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {:.4}</title></rect>"#,
                    left,
                    y + band * 0.1,
                    bar_w.max(0.0),
                    band * 0.8,
                    BAR_FILL,
                    escape_xml(&bar.label),
                    bar.probability
                ));
                svg.push_str(&format!(
                    r#"<text x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                    left - 6.0,
                    y + band / 2.0,
                    escape_xml(&bar.label)
                ));
            }
        }

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
            left, top, plot_w, plot_h
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            left + plot_w / 2.0,
            height - 10.0,
            escape_xml(&self.x_label)
        ));
        svg.push_str("</svg>");
        svg
    }
}

/// Escapes text for inclusion in XML or HTML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
