use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// One hourly sample from the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
}

impl Reading {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature_c,
            Metric::Humidity => self.humidity_pct,
            Metric::WindSpeed => self.wind_speed_mps,
        }
    }
}

/// Hourly readings ordered by ascending timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingsTable {
    rows: Vec<Reading>,
}

impl ReadingsTable {
    pub fn new(rows: Vec<Reading>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one metric across all rows, in time order.
    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(metric)).collect()
    }
}

/// The three numeric weather metrics shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Temperature,
    Humidity,
    WindSpeed,
}

impl Metric {
    /// Column order used by the pie chart and the correlation matrix.
    pub const fn all() -> [Metric; 3] {
        [Metric::Temperature, Metric::Humidity, Metric::WindSpeed]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::WindSpeed => "Wind Speed (m/s)",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::WindSpeed => "m/s",
        }
    }

    /// Value used by the page controls and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::WindSpeed => "wind_speed",
        }
    }

    /// Bar and line color.
    pub fn color(&self) -> &'static str {
        match self {
            Metric::Temperature => "royalblue",
            Metric::Humidity => "lightcoral",
            Metric::WindSpeed => "yellowgreen",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Metric {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();

        Metric::all()
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed) || m.label() == trimmed)
            .ok_or_else(|| {
                Error::InvalidControl(format!(
                    "Unknown metric '{value}'. Supported metrics: temperature, humidity, wind_speed."
                ))
            })
    }
}
