//! Core library for the live weather dashboard.
//!
//! This crate defines:
//! - Configuration loading
//! - The Open-Meteo fetcher behind the `ReadingsSource` abstraction
//! - Windowing, summary statistics and the correlation matrix
//! - Plotly-compatible chart specs and the per-cycle dashboard update
//!
//! It is used by the `weather-dash` server, but the update pipeline has no
//! dependency on any particular web framework or scheduler.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod stats;
pub mod window;

pub use config::Config;
pub use dashboard::{Controls, RenderOutput, Trigger};
pub use error::{Error, Result};
pub use model::{Metric, Reading, ReadingsTable};
pub use provider::{OpenMeteoClient, ReadingsSource, StaticSource};
pub use stats::CorrelationMatrix;
