use thiserror::Error;

/// Everything that can abort a dashboard cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// The forecast request could not complete or returned a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A statistic could not be computed from the fetched data.
    #[error("Computation error: {0}")]
    Computation(String),

    /// A control value (metric or hour count) is out of range.
    #[error("Invalid control value: {0}")]
    InvalidControl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Network(_) => "NETWORK_ERROR",
            Error::Schema(_) => "SCHEMA_ERROR",
            Error::Computation(_) => "COMPUTATION_ERROR",
            Error::InvalidControl(_) => "INVALID_CONTROL",
            Error::Config(_) => "CONFIGURATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
