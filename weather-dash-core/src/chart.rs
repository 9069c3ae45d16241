//! Chart specifications for the four dashboard panels.
//!
//! The types mirror the Plotly.js figure schema, so a serialized [`Figure`]
//! can be handed straight to `Plotly.react`. Non-finite numbers serialize as
//! `null`, which Plotly renders as a gap.

use serde::Serialize;

use crate::{
    model::{Metric, Reading},
    stats::CorrelationMatrix,
    window::Window,
};

/// Fixed slice colors for the pie chart, applied by position.
pub const PIE_COLORS: [&str; 3] = ["green", "yellow", "red"];

pub const HEATMAP_COLORSCALE: &str = "Viridis";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Pie(PieTrace),
    Heatmap(HeatmapTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub line: Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    pub z: Vec<Vec<f64>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub colorscale: String,
    pub colorbar: ColorBar,
    pub showscale: bool,
    pub zmin: f64,
    pub zmax: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Title::new(title),
            xaxis: None,
            yaxis: None,
            annotations: Vec::new(),
        }
    }

    fn with_axes(mut self, x: &str, y: &str) -> Self {
        self.xaxis = Some(Axis { title: Title::new(x) });
        self.yaxis = Some(Axis { title: Title::new(y) });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub x: String,
    pub y: String,
    pub text: String,
    pub showarrow: bool,
    pub font: Font,
    pub align: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: String,
}

/// Single bar holding the latest value of `metric`.
pub fn bar(metric: Metric, latest: &Reading) -> Figure {
    let trace = BarTrace {
        x: vec![metric.label().to_string()],
        y: vec![latest.value(metric)],
        marker: Marker {
            color: Some(metric.color().to_string()),
            colors: None,
        },
    };

    Figure {
        data: vec![Trace::Bar(trace)],
        layout: Layout::titled(format!("Current {metric}")).with_axes("Metric", "Value"),
    }
}

/// `metric` across every row of the window, drawn as lines with markers.
pub fn line(window: Window<'_>, metric: Metric) -> Figure {
    let trace = ScatterTrace {
        x: window.iter().map(|r| r.time.format(TIME_FORMAT).to_string()).collect(),
        y: window.iter().map(|r| r.value(metric)).collect(),
        mode: "lines+markers".to_string(),
        name: metric.label().to_string(),
        line: Line { color: metric.color().to_string() },
    };

    Figure {
        data: vec![Trace::Scatter(trace)],
        layout: Layout::titled(format!("{metric} Trends Over Time")).with_axes("Time", "Value"),
    }
}

/// One slice per metric with its raw latest value; Plotly does the normalizing.
pub fn pie(metric: Metric, latest: &Reading) -> Figure {
    let trace = PieTrace {
        labels: Metric::all().iter().map(|m| m.label().to_string()).collect(),
        values: Metric::all().iter().map(|m| latest.value(*m)).collect(),
        marker: Marker {
            color: None,
            colors: Some(PIE_COLORS.iter().map(|c| c.to_string()).collect()),
        },
    };

    Figure {
        data: vec![Trace::Pie(trace)],
        layout: Layout::titled(format!("{metric} Proportions")),
    }
}

/// Correlation grid with every cell annotated to two decimals.
pub fn heatmap(matrix: &CorrelationMatrix) -> Figure {
    let labels: Vec<String> = matrix.metrics().iter().map(|m| m.label().to_string()).collect();

    let trace = HeatmapTrace {
        z: matrix.rows().iter().map(|row| row.to_vec()).collect(),
        x: labels.clone(),
        y: labels.clone(),
        colorscale: HEATMAP_COLORSCALE.to_string(),
        colorbar: ColorBar { title: Title::new("Correlation") },
        showscale: true,
        zmin: -1.0,
        zmax: 1.0,
    };

    let mut annotations = Vec::with_capacity(labels.len() * labels.len());
    for (i, row) in matrix.rows().iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            annotations.push(Annotation {
                x: labels[j].clone(),
                y: labels[i].clone(),
                text: cell_text(*value),
                showarrow: false,
                font: Font { size: 12, color: "white".to_string() },
                align: "center".to_string(),
            });
        }
    }

    let mut layout =
        Layout::titled("Correlation Matrix of Weather Features").with_axes("Features", "Features");
    layout.annotations = annotations;

    Figure {
        data: vec![Trace::Heatmap(trace)],
        layout,
    }
}

fn cell_text(value: f64) -> String {
    if value.is_nan() { "nan".to_string() } else { format!("{value:.2}") }
}
