use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    error::{Error, Result},
    model::{Reading, ReadingsTable},
};

use super::ReadingsSource;

/// Fixed location: New Delhi.
pub const LATITUDE: &str = "28.6139";
pub const LONGITUDE: &str = "77.2090";

pub const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,windspeed_10m";

/// Number of trailing hourly entries kept from each response.
pub const MAX_HOURS: usize = 168;

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

#[async_trait]
impl ReadingsSource for OpenMeteoClient {
    async fn fetch(&self) -> Result<ReadingsTable> {
        let url = self.forecast_url();
        tracing::debug!(%url, "fetching hourly forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", LATITUDE),
                ("longitude", LONGITUDE),
                ("hourly", HOURLY_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to Open-Meteo: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read Open-Meteo response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::Network(format!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let table = parse_forecast(&body)?;
        tracing::debug!(rows = table.len(), "parsed hourly forecast");
        Ok(table)
    }
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    windspeed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    hourly: OmHourly,
}

/// Parse a forecast body into a table holding the last [`MAX_HOURS`] entries.
///
/// Null values inside the numeric arrays become NaN.
pub fn parse_forecast(body: &str) -> Result<ReadingsTable> {
    let parsed: OmResponse = serde_json::from_str(body)
        .map_err(|e| Error::Schema(format!("Failed to parse Open-Meteo forecast JSON: {e}")))?;

    let hourly = parsed.hourly;
    let len = hourly.time.len();

    if hourly.temperature_2m.len() != len
        || hourly.relative_humidity_2m.len() != len
        || hourly.windspeed_10m.len() != len
    {
        return Err(Error::Schema(format!(
            "Hourly arrays are not aligned: time={}, temperature_2m={}, relative_humidity_2m={}, windspeed_10m={}",
            len,
            hourly.temperature_2m.len(),
            hourly.relative_humidity_2m.len(),
            hourly.windspeed_10m.len(),
        )));
    }

    let skip = len.saturating_sub(MAX_HOURS);

    let rows = hourly
        .time
        .iter()
        .zip(&hourly.temperature_2m)
        .zip(&hourly.relative_humidity_2m)
        .zip(&hourly.windspeed_10m)
        .skip(skip)
        .map(|(((time, temp), humidity), wind)| {
            Ok(Reading {
                time: parse_time(time)?,
                temperature_c: temp.unwrap_or(f64::NAN),
                humidity_pct: humidity.unwrap_or(f64::NAN),
                wind_speed_mps: wind.unwrap_or(f64::NAN),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReadingsTable::new(rows))
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| Error::Schema(format!("Invalid timestamp '{raw}' in hourly.time")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
