use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    chart::{self, Figure},
    error::{Error, Result},
    model::{Metric, Reading, ReadingsTable},
    provider::ReadingsSource,
    stats,
    window::{self, DEFAULT_HOURS, MAX_HOURS, MIN_HOURS},
};

pub const TITLE: &str = "Live Weather Dashboard";

/// Current values of the page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub metric: Metric,
    pub hours: u32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            hours: DEFAULT_HOURS,
        }
    }
}

impl Controls {
    pub fn new(metric: Metric, hours: u32) -> Result<Self> {
        if !(MIN_HOURS..=MAX_HOURS).contains(&hours) {
            return Err(Error::InvalidControl(format!(
                "Hour count {hours} is out of range; expected {MIN_HOURS}..={MAX_HOURS}"
            )));
        }
        Ok(Self { metric, hours })
    }
}

/// What caused a cycle to run. Every trigger re-runs the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Refresh timer fired; carries the tick count. The first load is `Tick(0)`.
    Tick(u64),
    MetricChanged,
    HoursChanged,
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Tick(0)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Tick(n) => write!(f, "tick #{n}"),
            Trigger::MetricChanged => f.write_str("metric changed"),
            Trigger::HoursChanged => f.write_str("hours changed"),
        }
    }
}

/// Everything the page shows, replaced as a whole after each cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub current_weather: Vec<String>,
    pub summary: String,
    pub bar: Figure,
    pub line: Figure,
    pub pie: Figure,
    pub heatmap: Figure,
}

/// Window, summarize and chart an already fetched table.
pub fn render(table: &ReadingsTable, controls: Controls) -> Result<RenderOutput> {
    let window = window::select(table, controls.hours);
    let latest = stats::latest(window)?;
    let matrix = stats::correlate(table)?;
    let metric = controls.metric;

    Ok(RenderOutput {
        current_weather: current_weather(&latest),
        summary: summary(metric, &latest),
        bar: chart::bar(metric, &latest),
        line: chart::line(window, metric),
        pie: chart::pie(metric, &latest),
        heatmap: chart::heatmap(&matrix),
    })
}

/// One full cycle: fetch fresh readings, then render them.
pub async fn run_cycle(
    source: &dyn ReadingsSource,
    trigger: Trigger,
    controls: Controls,
) -> Result<RenderOutput> {
    tracing::debug!(%trigger, metric = %controls.metric, hours = controls.hours, "starting cycle");

    let table = source.fetch().await?;
    let output = render(&table, controls)?;

    tracing::debug!(%trigger, rows = table.len(), "cycle finished");
    Ok(output)
}

fn current_weather(latest: &Reading) -> Vec<String> {
    vec![
        format!("Temperature: {}°C", fmt_value(latest.temperature_c)),
        format!("Humidity: {}%", fmt_value(latest.humidity_pct)),
        format!("Wind Speed: {} m/s", fmt_value(latest.wind_speed_mps)),
    ]
}

fn summary(metric: Metric, latest: &Reading) -> String {
    format!(
        "Latest Weather - {}: {} {}",
        metric.label(),
        fmt_value(latest.value(metric)),
        metric.unit()
    )
}

/// Always shows a decimal point, so whole numbers read as `25.0`.
fn fmt_value(value: f64) -> String {
    if value.is_nan() { "nan".to_string() } else { format!("{value:?}") }
}
